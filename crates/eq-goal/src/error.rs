// error.rs — Error types for the goal store.

use thiserror::Error;

/// Errors that can occur during goal store operations.
#[derive(Debug, Error)]
pub enum GoalError {
    /// Input to `create` was rejected before any mutation.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The requested goal was not found.
    #[error("goal not found: {0}")]
    NotFound(String),

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize goal data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Persisted data was readable but does not describe a valid store.
    #[error("malformed stored data: {0}")]
    Malformed(String),

    /// The settings file could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl GoalError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        GoalError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// The field named by a validation error, if this is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            GoalError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
