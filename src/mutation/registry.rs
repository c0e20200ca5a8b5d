use crate::{
    foundation::error::{MutateError, MutateResult},
    mutation::{operation::Operation, sampler::Sampler},
};

/// Ordered, non-empty set of operations a chain picks from.
///
/// Fixed at construction and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registry {
    ops: Vec<Operation>,
}

impl Registry {
    pub fn new(ops: Vec<Operation>) -> MutateResult<Self> {
        if ops.is_empty() {
            return Err(MutateError::validation(
                "operation registry must contain at least one operation",
            ));
        }
        Ok(Self { ops })
    }

    pub fn standard() -> Self {
        Self {
            ops: Operation::STANDARD.to_vec(),
        }
    }

    /// Registry restricted to the named operations, in the order given.
    ///
    /// Names may include opt-in operations. Duplicates are kept, which weights
    /// the selection toward them.
    pub fn select<S: AsRef<str>>(names: &[S]) -> MutateResult<Self> {
        let ops = names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                Operation::from_name(n)
                    .ok_or_else(|| MutateError::validation(format!("unknown operation '{n}'")))
            })
            .collect::<MutateResult<Vec<_>>>()?;
        Self::new(ops)
    }

    pub fn list(&self) -> &[Operation] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Uniform pick; every call is independent, so chains may repeat operations.
    pub fn pick_random(&self, sampler: &mut dyn Sampler) -> Operation {
        let len = self.ops.len();
        let idx = sampler.uniform(0.0, len as f64).floor();
        let idx = if idx.is_finite() && idx > 0.0 {
            (idx as usize).min(len - 1)
        } else {
            0
        };
        self.ops[idx]
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mutation/registry.rs"]
mod tests;
