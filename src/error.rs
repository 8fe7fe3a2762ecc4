// Error types module
use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Main error type for sqlbench
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Execution of '{id}' failed on trial {trial}: {message}")]
    Execution {
        id: String,
        trial: u32,
        message: String,
    },

    #[error("Query source error: {0}")]
    QuerySource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Database-level failure reported by a [`crate::database::Database`] or
/// [`crate::database::Session`]. Connection, syntax and constraint failures
/// all land here; nothing is classified as retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DbError {
    pub message: String,
}

impl DbError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}
