//! The image-handle capability the mutation engine drives.
//!
//! The engine decides *which* transform runs and *with what parameters* by
//! building a [`Transform`]; a [`Canvas`] implementation decides how pixels change.

use crate::foundation::core::Dims;

/// A fully parameterized pixel transform request.
///
/// Percentages follow the "100 means unchanged" convention used by modulate-style
/// adjustments.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    Identity,
    /// Clip `black`% of the darkest and `white`% of the brightest pixels, stretch the rest.
    ContrastStretch { black: f64, white: f64 },
    Blur { sigma: f64 },
    Sharpen { sigma: f64 },
    /// Invert every channel value above `threshold` (fraction of the full range).
    Solarize { threshold: f64 },
    Normalize,
    Modulate {
        brightness: f64,
        saturation: f64,
        hue: f64,
    },
    SigmoidalContrast {
        sharpen: bool,
        contrast: f64,
        midpoint: f64,
    },
    Sketch { sigma: f64, angle: f64 },
    Swirl { degrees: f64 },
    Wave { amplitude: f64, wave_length: f64 },
    Implode { amount: f64 },
    Equalize,
    Enhance,
    AutoLevel,
    AutoGamma,
    BlueShift { factor: f64 },
    Despeckle,
    /// Map each `from` corner onto the matching `to` corner.
    Perspective {
        from: [(f64, f64); 4],
        to: [(f64, f64); 4],
    },
    Rotate { degrees: f64, fill: [u8; 4] },
    Charcoal { sigma: f64 },
}

impl Transform {
    /// Whether this transform may leave the canvas with different dimensions.
    pub fn may_resize(&self) -> bool {
        matches!(self, Transform::Perspective { .. })
    }
}

/// Failure reported by a [`Canvas`] when a transform cannot be carried out.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum TransformError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("image has no pixels")]
    EmptyImage,
}

impl TransformError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::Degenerate(msg.into())
    }

    /// Stable numeric code, reported next to the operation name in progress output.
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidParameter(_) => 1,
            Self::Degenerate(_) => 2,
            Self::EmptyImage => 3,
        }
    }
}

/// An exclusively owned, mutable image handle.
///
/// `Clone` must produce an independent copy: the executor clones the source
/// once per variant and never aliases it.
pub trait Canvas: Clone + Send + Sync {
    fn dims(&self) -> Dims;

    /// Crop to `width x height` starting at `(x, y)`.
    ///
    /// The size is clamped to the current bounds first, then the offset is pulled
    /// back so the rectangle fits. A non-empty image never crops to nothing.
    fn crop(&mut self, width: u32, height: u32, x: u32, y: u32);

    fn apply(&mut self, transform: &Transform) -> Result<(), TransformError>;
}

#[cfg(test)]
#[path = "../tests/unit/canvas.rs"]
mod tests;
