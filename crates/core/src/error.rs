//! Core Error Types
//!
//! Errors raised by the domain model itself. The application crate maps these
//! onto its own `AppError` variants.

use thiserror::Error;

/// Core error type for the Desktop Notes workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A status string outside the enumerated set
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an invalid status error
    pub fn invalid_status(msg: impl Into<String>) -> Self {
        Self::InvalidStatus(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
