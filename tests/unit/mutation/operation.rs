use std::collections::HashSet;

use super::*;
use crate::mutation::sampler::RngSampler;

const DIMS: Dims = Dims {
    width: 400,
    height: 200,
};

fn all_ops() -> impl Iterator<Item = Operation> {
    Operation::STANDARD
        .into_iter()
        .chain(Operation::OPT_IN)
}

/// The chaos-scaled values carried by a planned transform.
fn chaotic_params(op: Operation, t: &Transform) -> Vec<f64> {
    match (op, t) {
        (Operation::Hue, Transform::Modulate { hue, .. }) => vec![hue - 100.0],
        (Operation::Saturation, Transform::Modulate { saturation, .. }) => {
            vec![saturation - 100.0]
        }
        (Operation::Brightness, Transform::Modulate { brightness, .. }) => {
            vec![brightness - 100.0]
        }
        (_, Transform::SigmoidalContrast { contrast, .. }) => vec![*contrast],
        (_, Transform::Sketch { sigma, .. }) => vec![*sigma],
        (_, Transform::Swirl { degrees }) => vec![*degrees],
        (_, Transform::Wave { amplitude, .. }) => vec![*amplitude],
        (_, Transform::Implode { amount }) => vec![*amount],
        (_, Transform::BlueShift { factor }) => vec![*factor],
        (_, Transform::Rotate { degrees, .. }) => vec![*degrees],
        (_, Transform::Perspective { from, to }) => {
            let ws = f64::from(DIMS.width) * 0.25;
            let hs = f64::from(DIMS.height) * 0.25;
            from.iter()
                .zip(to.iter())
                .flat_map(|(f, t)| [(t.0 - f.0) / ws, (t.1 - f.1) / hs])
                .collect()
        }
        _ => vec![],
    }
}

#[test]
fn names_are_unique_and_resolvable() {
    let mut seen = HashSet::new();
    for op in all_ops() {
        assert!(seen.insert(op.name()), "duplicate name {}", op.name());
        assert_eq!(Operation::from_name(op.name()), Some(op));
    }
    assert_eq!(
        Operation::from_name(" Auto-Level "),
        Some(Operation::AutoLevel)
    );
    assert_eq!(Operation::from_name("charcoal"), Some(Operation::Charcoal));
    assert_eq!(Operation::from_name("oil_paint"), None);
}

#[test]
fn only_perspective_alters_size() {
    let altering: Vec<_> = all_ops().filter(|op| op.is_size_altering()).collect();
    assert_eq!(altering, vec![Operation::Perspective]);
}

#[test]
fn chaos_zero_degenerates_every_bound() {
    for op in all_ops() {
        if let Some(b) = op.chaos_bounds(Chaos::new(0.0).unwrap()) {
            assert_eq!(b.width(), 0.0, "{op}");
        }
    }
}

#[test]
fn chaos_zero_plans_identity_parameters() {
    let mut s = RngSampler::seeded(3);
    let chaos = Chaos::new(0.0).unwrap();

    assert_eq!(
        Operation::Rotate.plan(&mut s, chaos, DIMS),
        Transform::Rotate {
            degrees: 0.0,
            fill: [255; 4]
        }
    );
    assert_eq!(
        Operation::Swirl.plan(&mut s, chaos, DIMS),
        Transform::Swirl { degrees: 0.0 }
    );
    assert_eq!(
        Operation::Implode.plan(&mut s, chaos, DIMS),
        Transform::Implode { amount: 0.0 }
    );
    assert_eq!(
        Operation::BlueShift.plan(&mut s, chaos, DIMS),
        Transform::BlueShift { factor: 1.0 }
    );
    for op in [Operation::Hue, Operation::Saturation, Operation::Brightness] {
        assert_eq!(
            op.plan(&mut s, chaos, DIMS),
            Transform::Modulate {
                brightness: 100.0,
                saturation: 100.0,
                hue: 100.0
            }
        );
    }
    let Transform::Perspective { from, to } = Operation::Perspective.plan(&mut s, chaos, DIMS)
    else {
        panic!("perspective must plan a perspective transform");
    };
    assert_eq!(from, to);
    assert_eq!(from[3], (400.0, 200.0));
}

#[test]
fn sampled_parameters_stay_within_declared_bounds() {
    let mut s = RngSampler::seeded(11);
    for chaos in [0.05, 0.25, 0.5, 1.0, 2.5, -0.75] {
        let chaos = Chaos::new(chaos).unwrap();
        for op in all_ops() {
            let Some(bounds) = op.chaos_bounds(chaos) else {
                continue;
            };
            for _ in 0..200 {
                let t = op.plan(&mut s, chaos, DIMS);
                let params = chaotic_params(op, &t);
                assert!(!params.is_empty(), "{op} planned {t:?}");
                for p in params {
                    assert!(
                        bounds.contains(p),
                        "{op} at chaos {}: {p} outside {bounds:?}",
                        chaos.get()
                    );
                }
            }
        }
    }
}

#[test]
fn bound_width_is_monotone_in_chaos() {
    let levels = [0.0, 0.01, 0.1, 0.25, 0.5, 1.0, 4.0];
    for op in all_ops() {
        let mut last = 0.0;
        for c in levels {
            let Some(b) = op.chaos_bounds(Chaos::new(c).unwrap()) else {
                continue;
            };
            assert!(b.width() >= last, "{op}: width shrank at chaos {c}");
            last = b.width();
        }
    }
}

#[test]
fn fixed_range_operations_ignore_chaos() {
    let mut s = RngSampler::seeded(5);
    for _ in 0..200 {
        match Operation::ContrastStretch.plan(&mut s, Chaos::new(0.0).unwrap(), DIMS) {
            Transform::ContrastStretch { black, white } => {
                assert!((0.0..0.8).contains(&black));
                assert!(white >= black + 0.1 - 1e-9 && white <= 1.0 + 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
        match Operation::Blur.plan(&mut s, Chaos::new(0.0).unwrap(), DIMS) {
            Transform::Blur { sigma } => assert!((0.0..10.0).contains(&sigma)),
            other => panic!("unexpected {other:?}"),
        }
        match Operation::Wave.plan(&mut s, Chaos::new(0.0).unwrap(), DIMS) {
            Transform::Wave {
                amplitude,
                wave_length,
            } => {
                assert_eq!(amplitude, 0.0);
                assert!((0.0..100.0).contains(&wave_length));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
