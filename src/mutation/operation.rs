use crate::{
    canvas::{Canvas, Transform, TransformError},
    foundation::core::{Chaos, Dims},
    mutation::sampler::{Bounds, Sampler},
};

const SWIRL_STRENGTH: f64 = 12.0;
const WAVE_MAX_WAVE_LENGTH: f64 = 100.0;
const WAVE_MAX_AMPLITUDE: f64 = 0.5;
const IMPLODE_MAX: f64 = 0.1;
const PERSPECTIVE_FACTOR: f64 = 0.25;
const ROTATE_DEGREES_MAX: f64 = 20.0;
const MODULATE_SPREAD: f64 = 50.0;
const SIGMOIDAL_BASE: f64 = 2.5;
const SIGMOIDAL_SPREAD: f64 = 10.0;
const BLUESHIFT_SPREAD: f64 = 0.5;

const WHITE: [u8; 4] = [255, 255, 255, 255];

/// A named, randomized image transform.
///
/// Operations carry no state: every [`Operation::apply`] re-samples its
/// parameters from the sampler it is handed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Noop,
    ContrastStretch,
    Blur,
    Sharpen,
    Solarize,
    Normalize,
    Hue,
    Saturation,
    Brightness,
    SigmoidalContrastIncrease,
    SigmoidalContrastDecrease,
    Sketch,
    Swirl,
    Wave,
    Implode,
    Equalize,
    Enhance,
    AutoLevel,
    AutoGamma,
    BlueShift,
    Despeckle,
    Perspective,
    Rotate,
    Charcoal,
}

impl Operation {
    /// Default registry contents, in selection order.
    pub const STANDARD: [Operation; 23] = [
        Operation::Noop,
        Operation::ContrastStretch,
        Operation::Blur,
        Operation::Sharpen,
        Operation::Solarize,
        Operation::Normalize,
        Operation::Hue,
        Operation::Saturation,
        Operation::Brightness,
        Operation::SigmoidalContrastIncrease,
        Operation::SigmoidalContrastDecrease,
        Operation::Sketch,
        Operation::Swirl,
        Operation::Wave,
        Operation::Implode,
        Operation::Equalize,
        Operation::Enhance,
        Operation::AutoLevel,
        Operation::AutoGamma,
        Operation::BlueShift,
        Operation::Despeckle,
        Operation::Perspective,
        Operation::Rotate,
    ];

    /// Operations that exist but are only used when requested by name.
    pub const OPT_IN: [Operation; 1] = [Operation::Charcoal];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Noop => "noop",
            Operation::ContrastStretch => "contrast_stretch",
            Operation::Blur => "blur",
            Operation::Sharpen => "sharpen",
            Operation::Solarize => "solarize",
            Operation::Normalize => "normalize",
            Operation::Hue => "hue",
            Operation::Saturation => "saturation",
            Operation::Brightness => "brightness",
            Operation::SigmoidalContrastIncrease => "sigmoidal_contrast_increase",
            Operation::SigmoidalContrastDecrease => "sigmoidal_contrast_decrease",
            Operation::Sketch => "sketch",
            Operation::Swirl => "swirl",
            Operation::Wave => "wave",
            Operation::Implode => "implode",
            Operation::Equalize => "equalize",
            Operation::Enhance => "enhance",
            Operation::AutoLevel => "auto_level",
            Operation::AutoGamma => "auto_gamma",
            Operation::BlueShift => "blueshift",
            Operation::Despeckle => "despeckle",
            Operation::Perspective => "perspective",
            Operation::Rotate => "rotate",
            Operation::Charcoal => "charcoal",
        }
    }

    pub fn from_name(name: &str) -> Option<Operation> {
        let name = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::STANDARD
            .iter()
            .chain(Self::OPT_IN.iter())
            .copied()
            .find(|op| op.name() == name)
    }

    /// Whether the operation may change the image dimensions.
    pub fn is_size_altering(self) -> bool {
        matches!(self, Operation::Perspective)
    }

    /// Range of the chaos-scaled parameter, or `None` when chaos has no influence.
    ///
    /// Every returned range has zero width at chaos 0. For perspective the range
    /// is the per-corner displacement as a fraction of a quarter side.
    pub fn chaos_bounds(self, chaos: Chaos) -> Option<Bounds> {
        let b = match self {
            Operation::Hue | Operation::Saturation | Operation::Brightness => {
                Bounds::symmetric(chaos.scale(MODULATE_SPREAD))
            }
            Operation::SigmoidalContrastIncrease | Operation::SigmoidalContrastDecrease => {
                Bounds::new(0.0, chaos.scale(SIGMOIDAL_SPREAD)).shifted(SIGMOIDAL_BASE)
            }
            Operation::Sketch => Bounds::new(chaos.scale(0.5), chaos.scale(20.0)),
            Operation::Swirl => Bounds::symmetric(chaos.scale(SWIRL_STRENGTH / 2.0)),
            Operation::Wave => Bounds::point(chaos.scale(WAVE_MAX_AMPLITUDE)),
            Operation::Implode => Bounds::new(0.0, chaos.scale(IMPLODE_MAX)),
            Operation::BlueShift => Bounds::new(0.0, chaos.scale(BLUESHIFT_SPREAD)).shifted(1.0),
            Operation::Perspective => Bounds::symmetric(chaos.get()),
            Operation::Rotate => Bounds::symmetric(chaos.scale(ROTATE_DEGREES_MAX)),
            _ => return None,
        };
        Some(b)
    }

    /// Sample this operation's parameters for an image of `dims`.
    pub fn plan(self, sampler: &mut dyn Sampler, chaos: Chaos, dims: Dims) -> Transform {
        let chaos_bounds = self.chaos_bounds(chaos);
        let mut chaotic = || chaos_bounds.map_or(0.0, |b| b.sample(sampler));

        match self {
            Operation::Noop => Transform::Identity,
            Operation::ContrastStretch => {
                let black = sampler.uniform(0.0, 0.8);
                let spread = sampler.uniform(0.1, 1.0 - black);
                Transform::ContrastStretch {
                    black,
                    white: black + spread,
                }
            }
            Operation::Blur => Transform::Blur {
                sigma: sampler.uniform(0.0, 10.0),
            },
            Operation::Sharpen => Transform::Sharpen {
                sigma: sampler.uniform(0.0, 5.0),
            },
            Operation::Solarize => Transform::Solarize {
                threshold: sampler.uniform(0.0, 1.0),
            },
            Operation::Normalize => Transform::Normalize,
            Operation::Hue => Transform::Modulate {
                brightness: 100.0,
                saturation: 100.0,
                hue: 100.0 + chaotic(),
            },
            Operation::Saturation => Transform::Modulate {
                brightness: 100.0,
                saturation: 100.0 + chaotic(),
                hue: 100.0,
            },
            Operation::Brightness => Transform::Modulate {
                brightness: 100.0 + chaotic(),
                saturation: 100.0,
                hue: 100.0,
            },
            Operation::SigmoidalContrastIncrease => Transform::SigmoidalContrast {
                sharpen: true,
                contrast: chaotic(),
                midpoint: 50.0,
            },
            Operation::SigmoidalContrastDecrease => Transform::SigmoidalContrast {
                sharpen: false,
                contrast: chaotic(),
                midpoint: 50.0,
            },
            Operation::Sketch => {
                let sigma = chaotic();
                Transform::Sketch {
                    sigma,
                    angle: sampler.uniform(0.0, 180.0),
                }
            }
            Operation::Swirl => Transform::Swirl { degrees: chaotic() },
            Operation::Wave => {
                let amplitude = chaotic();
                Transform::Wave {
                    amplitude,
                    wave_length: sampler.uniform(0.0, WAVE_MAX_WAVE_LENGTH),
                }
            }
            Operation::Implode => Transform::Implode { amount: chaotic() },
            Operation::Equalize => Transform::Equalize,
            Operation::Enhance => Transform::Enhance,
            Operation::AutoLevel => Transform::AutoLevel,
            Operation::AutoGamma => Transform::AutoGamma,
            Operation::BlueShift => Transform::BlueShift { factor: chaotic() },
            Operation::Despeckle => Transform::Despeckle,
            Operation::Perspective => {
                let w = f64::from(dims.width);
                let h = f64::from(dims.height);
                let from = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];
                let (ws, hs) = (w * PERSPECTIVE_FACTOR, h * PERSPECTIVE_FACTOR);
                let mut to = from;
                for corner in &mut to {
                    corner.0 += ws * chaotic();
                    corner.1 += hs * chaotic();
                }
                Transform::Perspective { from, to }
            }
            Operation::Rotate => Transform::Rotate {
                degrees: chaotic(),
                fill: WHITE,
            },
            Operation::Charcoal => Transform::Charcoal { sigma: 0.5 },
        }
    }

    /// Sample parameters and run the transform on `canvas`.
    ///
    /// Returns the transform that was attempted alongside its outcome.
    pub fn apply<C: Canvas>(
        self,
        canvas: &mut C,
        sampler: &mut dyn Sampler,
        chaos: Chaos,
    ) -> (Transform, Result<(), TransformError>) {
        let transform = self.plan(sampler, chaos, canvas.dims());
        let outcome = canvas.apply(&transform);
        (transform, outcome)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mutation/operation.rs"]
mod tests;
