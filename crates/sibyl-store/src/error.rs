//! Error types for the context index

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Context index error type
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Schema/migration error
    #[error("Schema error: {0}")]
    Schema(String),

    /// The embedding provider failed or returned malformed output
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Caller error (bad k, unknown collection name in storage)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Metadata (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying rusqlite error
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

impl From<StoreError> for sibyl_core::SibylError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Embedding(msg) => Self::Embedding(msg),
            StoreError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            StoreError::Connection(msg) | StoreError::Schema(msg) => Self::Store(msg),
            StoreError::Serialization(e) => Self::Store(e.to_string()),
            StoreError::Rusqlite(e) => Self::Store(e.to_string()),
        }
    }
}
