//! Bot error type

use nef3a_sqlite::SqliteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Registry could not be opened
    #[error("registry error: {0}")]
    Store(#[from] SqliteError),
}
