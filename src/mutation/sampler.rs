use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of bounded random values consumed by operation parameter sampling.
pub trait Sampler {
    /// A value drawn uniformly from `[min, max)`.
    ///
    /// `min > max` is allowed and mirrors the range; `min == max` returns `min`.
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        (**self).uniform(min, max)
    }
}

/// [`Sampler`] backed by a `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSampler<R = StdRng> {
    rng: R,
}

impl RngSampler<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Independent sampler for one variant, derived from the process-wide seed.
    ///
    /// The same `(seed, input, variant)` always yields the same stream, whichever
    /// thread runs the variant.
    pub fn for_variant(seed: u64, input: usize, variant: u32) -> Self {
        Self::seeded(variant_seed(seed, input, variant))
    }
}

impl<R: Rng> RngSampler<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Sampler for RngSampler<R> {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        let u: f64 = self.rng.random();
        min + u * (max - min)
    }
}

pub fn variant_seed(seed: u64, input: usize, variant: u32) -> u64 {
    let job = ((input as u64) << 32) ^ u64::from(variant);
    mix64(seed ^ mix64(job.wrapping_add(0x9E37_79B9_7F4A_7C15)))
}

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Closed range a sampled parameter is drawn from.
///
/// `min`/`max` keep the order the operation computed them in, so a negative
/// chaos produces a mirrored range rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn symmetric(half_width: f64) -> Self {
        Self::new(-half_width, half_width)
    }

    pub fn point(v: f64) -> Self {
        Self::new(v, v)
    }

    pub fn shifted(self, by: f64) -> Self {
        Self::new(self.min + by, self.max + by)
    }

    pub fn width(self) -> f64 {
        (self.max - self.min).abs()
    }

    pub fn lo(self) -> f64 {
        self.min.min(self.max)
    }

    pub fn hi(self) -> f64 {
        self.min.max(self.max)
    }

    pub fn contains(self, v: f64) -> bool {
        self.lo() <= v && v <= self.hi()
    }

    pub fn sample(self, sampler: &mut dyn Sampler) -> f64 {
        sampler.uniform(self.min, self.max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mutation/sampler.rs"]
mod tests;
