//! Error types for the scorewatch monitoring core

use thiserror::Error;

/// Result type alias for scorewatch operations
pub type Result<T> = std::result::Result<T, ScorewatchError>;

/// Main error type for the monitoring core
#[derive(Error, Debug)]
pub enum ScorewatchError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Training error: {0}")]
    TrainingError(String),
}

impl From<polars::error::PolarsError> for ScorewatchError {
    fn from(err: polars::error::PolarsError) -> Self {
        ScorewatchError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ScorewatchError {
    fn from(err: serde_json::Error) -> Self {
        ScorewatchError::SerializationError(err.to_string())
    }
}
