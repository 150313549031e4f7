//! Storage error types

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Invalid record data
    #[error("invalid record data: {0}")]
    InvalidData(String),

    /// Storage backend error (database, filesystem, etc.)
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
