use crate::{
    canvas::{Canvas, Transform, TransformError},
    foundation::{core::Chaos, error::MutateError},
    mutation::{registry::Registry, sampler::Sampler},
};

/// One attempted operation within a chain.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainStep {
    pub op: &'static str,
    pub transform: Transform,
    pub outcome: Result<(), TransformError>,
}

impl ChainStep {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// What a chain attempted, in order; ends at the first failure if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChainResult {
    pub steps: Vec<ChainStep>,
}

impl ChainResult {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn op_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.op).collect()
    }

    /// The failing step, which is always the last one.
    pub fn failure(&self) -> Option<&ChainStep> {
        self.steps.last().filter(|s| !s.succeeded())
    }

    pub fn is_complete(&self, depth: usize) -> bool {
        self.failure().is_none() && self.steps.len() == depth
    }

    /// The chain failure as a [`MutateError::Operation`].
    pub fn error(&self) -> Option<MutateError> {
        let step = self.failure()?;
        let err = step.outcome.as_ref().err()?;
        Some(MutateError::Operation {
            op: step.op,
            code: err.code(),
            message: err.to_string(),
        })
    }
}

/// Progress-line rendering: `blur, hue, wave [error 1: ...]`.
impl std::fmt::Display for ChainResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(step.op)?;
            if let Err(e) = &step.outcome {
                write!(f, " [error {}: {e}]", e.code())?;
            }
        }
        Ok(())
    }
}

/// Applies randomly chosen operations to a private copy of a source image.
#[derive(Clone, Copy, Debug)]
pub struct MutationExecutor<'a> {
    registry: &'a Registry,
    chaos: Chaos,
}

impl<'a> MutationExecutor<'a> {
    pub fn new(registry: &'a Registry, chaos: Chaos) -> Self {
        Self { registry, chaos }
    }

    pub fn chaos(&self) -> Chaos {
        self.chaos
    }

    /// Run a chain of `depth` operations against a clone of `source`.
    ///
    /// The first failing operation ends the chain; the working image is returned
    /// in whatever state that failure left it.
    pub fn run<C: Canvas>(
        &self,
        source: &C,
        depth: usize,
        sampler: &mut dyn Sampler,
    ) -> (C, ChainResult) {
        self.run_with(source, depth, sampler, |_, _| {})
    }

    /// Like [`run`](Self::run), calling `on_step` with each step as soon as it
    /// has been applied (or has failed).
    #[tracing::instrument(skip(self, source, sampler, on_step))]
    pub fn run_with<C: Canvas>(
        &self,
        source: &C,
        depth: usize,
        sampler: &mut dyn Sampler,
        mut on_step: impl FnMut(usize, &ChainStep),
    ) -> (C, ChainResult) {
        let mut work = source.clone();
        let mut chain = ChainResult {
            steps: Vec::with_capacity(depth),
        };

        for i in 0..depth {
            let op = self.registry.pick_random(sampler);
            let (transform, outcome) = op.apply(&mut work, sampler, self.chaos);
            match &outcome {
                Ok(()) => tracing::debug!(step = i, op = op.name(), ?transform, "applied"),
                Err(e) => tracing::warn!(
                    step = i,
                    op = op.name(),
                    code = e.code(),
                    error = %e,
                    "operation failed, aborting chain"
                ),
            }
            let step = ChainStep {
                op: op.name(),
                transform,
                outcome,
            };
            on_step(i, &step);
            let failed = !step.succeeded();
            chain.steps.push(step);
            if failed {
                break;
            }
        }

        (work, chain)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mutation/executor.rs"]
mod tests;
