//! Error types for the EmoS engine

use thiserror::Error;

/// Errors that can occur while scoring or assessing
#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AssessmentError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AssessmentError::InvalidInput(_) => "INVALID_INPUT",
            AssessmentError::DivisionUndefined(_) => "DIVISION_UNDEFINED",
            AssessmentError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            AssessmentError::JsonError(_) => "JSON_ERROR",
        }
    }
}
