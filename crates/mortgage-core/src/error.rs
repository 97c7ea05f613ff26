use thiserror::Error;

use crate::breakdown::Component;

#[derive(Debug, Error)]
pub enum MortgageError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("{0} is fixed until the next full calculation and cannot be edited")]
    ImmutableComponent(Component),

    #[error("No calculation has been submitted yet")]
    NoResult,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MortgageError {
    fn from(e: serde_json::Error) -> Self {
        MortgageError::SerializationError(e.to_string())
    }
}
