//! Error types for automatic title generation.

use thiserror::Error;

/// Failures raised by an [`Evaluator`](crate::evaluator::Evaluator).
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// No evaluator is wired into the engine.
    #[error("Dynamic code evaluation is disabled")]
    Disabled,

    /// The code could not be parsed by the evaluator.
    #[error("Malformed code: {0}")]
    Malformed(String),

    /// The code failed while running.
    #[error("Runtime fault: {0}")]
    Runtime(String),
}

/// Title generation errors
#[derive(Debug, Error)]
pub enum TitleError {
    #[error("Entity type '{entity_type}' has no title attribute")]
    UnsupportedEntity { entity_type: String },

    #[error("Dynamic evaluation failed for {entity_type}.{bundle}: {source}")]
    DynamicEvaluation {
        entity_type: String,
        bundle: String,
        #[source]
        source: EvaluationError,
    },

    #[error("Token resolution failed: {0}")]
    TokenResolution(String),

    #[error("Failed to save record: {0}")]
    SaveFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid record data: {0}")]
    InvalidRecords(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for TitleError {
    fn from(err: config::ConfigError) -> Self {
        TitleError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for TitleError {
    fn from(err: serde_json::Error) -> Self {
        TitleError::InvalidRecords(err.to_string())
    }
}
