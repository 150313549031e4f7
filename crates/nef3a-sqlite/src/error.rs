//! Error types for SQLite storage backend

use nef3a_core::storage::StoreError;
use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, SqliteError>;

/// Errors that can occur during SQLite storage operations
#[derive(Debug, Error)]
pub enum SqliteError {
    /// Database connection or query error
    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record rejected before insert
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Registry schema could not be created
    #[error("Schema error: {0}")]
    Schema(String),
}

/// Convert SqliteError to StoreError for the storage trait
impl From<SqliteError> for StoreError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::InvalidRecord(msg) => StoreError::InvalidData(msg),
            SqliteError::Database(e) => StoreError::Backend(format!("SQLite: {}", e)),
            SqliteError::Schema(msg) => StoreError::Backend(format!("Schema: {}", msg)),
        }
    }
}
