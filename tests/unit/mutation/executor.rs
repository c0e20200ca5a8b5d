use super::*;
use crate::{
    foundation::core::Dims,
    mutation::{operation::Operation, sampler::RngSampler},
};

/// Records applied transforms; fails the call with index `fail_at`.
#[derive(Clone, Debug, PartialEq)]
struct FakeCanvas {
    dims: Dims,
    applied: Vec<Transform>,
    calls: usize,
    fail_at: Option<usize>,
}

impl FakeCanvas {
    fn new(fail_at: Option<usize>) -> Self {
        Self {
            dims: Dims::new(64, 48),
            applied: vec![],
            calls: 0,
            fail_at,
        }
    }
}

impl Canvas for FakeCanvas {
    fn dims(&self) -> Dims {
        self.dims
    }

    fn crop(&mut self, width: u32, height: u32, _x: u32, _y: u32) {
        self.dims = Dims::new(width, height);
    }

    fn apply(&mut self, transform: &Transform) -> Result<(), TransformError> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_at == Some(call) {
            return Err(TransformError::invalid("forced failure"));
        }
        self.applied.push(transform.clone());
        Ok(())
    }
}

fn noop_registry() -> Registry {
    Registry::new(vec![Operation::Noop]).unwrap()
}

#[test]
fn zero_length_chain_returns_clone_and_empty_result() {
    let registry = Registry::standard();
    let exec = MutationExecutor::new(&registry, Chaos::new(0.25).unwrap());
    let source = FakeCanvas::new(None);
    let mut s = RngSampler::seeded(1);

    let (out, chain) = exec.run(&source, 0, &mut s);
    assert_eq!(out, source);
    assert!(chain.is_empty());
    assert!(chain.is_complete(0));
    assert_eq!(chain.to_string(), "");
}

#[test]
fn full_chain_records_every_success() {
    let registry = Registry::standard();
    let exec = MutationExecutor::new(&registry, Chaos::new(0.25).unwrap());
    let source = FakeCanvas::new(None);
    let mut s = RngSampler::seeded(2);

    let (out, chain) = exec.run(&source, 5, &mut s);
    assert_eq!(chain.len(), 5);
    assert!(chain.is_complete(5));
    assert!(chain.failure().is_none());
    assert!(chain.error().is_none());
    assert_eq!(out.applied.len(), 5);
    assert_eq!(
        out.applied,
        chain
            .steps
            .iter()
            .map(|s| s.transform.clone())
            .collect::<Vec<_>>()
    );
    // The source is never touched.
    assert!(source.applied.is_empty());
    assert_eq!(source.calls, 0);
}

#[test]
fn chain_aborts_at_first_failure() {
    let registry = noop_registry();
    let exec = MutationExecutor::new(&registry, Chaos::new(0.25).unwrap());
    let mut s = RngSampler::seeded(3);

    for k in 0..4 {
        let source = FakeCanvas::new(Some(k));
        let (out, chain) = exec.run(&source, 10, &mut s);
        assert_eq!(chain.len(), k + 1, "fail at {k}");
        assert_eq!(out.applied.len(), k);
        assert_eq!(out.calls, k + 1);
        assert!(!chain.is_complete(10));

        let failed = chain.failure().unwrap();
        assert_eq!(failed.op, "noop");
        assert!(chain.steps[..k].iter().all(ChainStep::succeeded));
    }
}

#[test]
fn failure_surfaces_name_and_code() {
    let registry = noop_registry();
    let exec = MutationExecutor::new(&registry, Chaos::new(0.25).unwrap());
    let mut s = RngSampler::seeded(4);
    let (_, chain) = exec.run(&FakeCanvas::new(Some(1)), 3, &mut s);

    assert_eq!(
        chain.to_string(),
        "noop, noop [error 1: invalid parameter: forced failure]"
    );
    match chain.error().unwrap() {
        MutateError::Operation { op, code, .. } => {
            assert_eq!(op, "noop");
            assert_eq!(code, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn same_seed_same_chain() {
    let registry = Registry::standard();
    let exec = MutationExecutor::new(&registry, Chaos::new(0.5).unwrap());
    let source = FakeCanvas::new(None);

    let (_, a) = exec.run(&source, 8, &mut RngSampler::seeded(77));
    let (_, b) = exec.run(&source, 8, &mut RngSampler::seeded(77));
    assert_eq!(a, b);
    assert_eq!(a.op_names().len(), 8);
}

#[test]
fn steps_are_reported_as_they_run() {
    let registry = noop_registry();
    let exec = MutationExecutor::new(&registry, Chaos::new(0.25).unwrap());
    let mut seen = Vec::new();

    let (_, chain) = exec.run_with(
        &FakeCanvas::new(Some(2)),
        5,
        &mut RngSampler::seeded(5),
        |i, step| seen.push((i, step.clone())),
    );

    assert_eq!(seen.len(), 3);
    assert_eq!(seen.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(
        seen.into_iter().map(|(_, s)| s).collect::<Vec<_>>(),
        chain.steps
    );
    assert!(!chain.steps[2].succeeded());
}
