//! Engine error types

use crate::validation::ValidationResult;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Validation failed: {}", .0.summary())]
    Validation(ValidationResult),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QueryError {
    /// True for errors caused by caller input rather than by the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QueryError::Validation(_)
                | QueryError::BadRequest(_)
                | QueryError::InvalidCursor(_)
                | QueryError::JsonError(_)
        )
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            QueryError::Validation(result) => Some(result),
            _ => None,
        }
    }
}

impl From<ValidationResult> for QueryError {
    fn from(result: ValidationResult) -> Self {
        QueryError::Validation(result)
    }
}
