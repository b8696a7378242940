/// Convenience result type used across the crate.
pub type WavyteResult<T> = Result<T, WavyteError>;

/// Top-level error taxonomy used by stroke APIs.
#[derive(thiserror::Error, Debug)]
pub enum WavyteError {
    /// Caller-provided data violates a precondition (zero width, delta angle out of range, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while executing draw passes or resolving targets.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing scene documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WavyteError {
    /// Build a [`WavyteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WavyteError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`WavyteError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for WavyteError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
