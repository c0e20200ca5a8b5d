use std::path::Path;

/// Convenience result type used across mutate.
pub type MutateResult<T> = Result<T, MutateError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum MutateError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// An input image could not be read or decoded.
    #[error("load error: {0}")]
    Load(String),

    /// The output directory is missing or unusable.
    #[error("output error: {0}")]
    Output(String),

    /// A mutated variant could not be encoded or written.
    #[error("write error: {0}")]
    Write(String),

    /// A transform reported failure while applying an operation.
    #[error("operation error: {op}: error {code}: {message}")]
    Operation {
        /// Name of the failing operation.
        op: &'static str,
        /// Stable numeric code of the underlying transform failure.
        code: u32,
        /// Human-readable failure description.
        message: String,
    },

    /// Errors when serializing or deserializing settings and reports.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MutateError {
    /// Build a [`MutateError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MutateError::Load`] value naming the offending path.
    pub fn load(path: &Path, msg: impl std::fmt::Display) -> Self {
        Self::Load(format!("{}: {msg}", path.display()))
    }

    /// Build a [`MutateError::Output`] value naming the offending path.
    pub fn output(path: &Path, msg: impl std::fmt::Display) -> Self {
        Self::Output(format!("{}: {msg}", path.display()))
    }

    /// Build a [`MutateError::Write`] value naming the offending path.
    pub fn write(path: &Path, msg: impl std::fmt::Display) -> Self {
        Self::Write(format!("{}: {msg}", path.display()))
    }

    /// Build a [`MutateError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
