use crate::foundation::error::{MutateError, MutateResult};

/// Magnitude of randomization applied by every chaos-aware operation.
///
/// Conventionally in `[0, 1]` but never clamped: larger or negative values widen
/// (or mirror) every sampled range proportionally.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Chaos(f64);

impl Chaos {
    pub const DEFAULT: Chaos = Chaos(0.25);

    pub fn new(value: f64) -> MutateResult<Self> {
        if !value.is_finite() {
            return Err(MutateError::validation("chaos must be a finite number"));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// `magnitude * chaos`, the half-width of a symmetric chaos-scaled range.
    pub fn scale(self, magnitude: f64) -> f64 {
        magnitude * self.0
    }
}

impl TryFrom<f64> for Chaos {
    type Error = MutateError;

    fn try_from(value: f64) -> MutateResult<Self> {
        Self::new(value)
    }
}

impl From<Chaos> for f64 {
    fn from(chaos: Chaos) -> f64 {
        chaos.0
    }
}

impl Default for Chaos {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

impl Dims {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `(original - self)` per axis, signed.
    pub fn delta_from(self, original: Dims) -> (i64, i64) {
        (
            i64::from(original.width) - i64::from(self.width),
            i64::from(original.height) - i64::from(self.height),
        )
    }

    pub fn fits_within(self, other: Dims) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
