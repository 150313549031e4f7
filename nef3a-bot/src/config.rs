//! Bot configuration types

use std::path::PathBuf;

use nef3a_core::{EngineConfig, SenderId};
use nef3a_sqlite::SqliteStore;
use tracing::warn;

use crate::error::BotError;

/// Runtime configuration assembled from the command line and environment.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Registry database path
    pub database: PathBuf,
    /// Create an empty registry when `database` does not exist. An existing
    /// database is always opened read-only.
    pub create_if_missing: bool,
    /// Engine settings
    pub engine: EngineConfig,
}

impl BotConfig {
    pub fn new(database: impl Into<PathBuf>, access_code: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            create_if_missing: false,
            engine: EngineConfig::new(access_code),
        }
    }

    pub fn admin(mut self, admin_id: Option<SenderId>) -> Self {
        self.engine.admin_id = admin_id;
        self
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.engine.batch_size = batch_size;
        self
    }

    pub fn fuzzy_window(mut self, fuzzy_window: usize) -> Self {
        self.engine.fuzzy_window = fuzzy_window;
        self
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), BotError> {
        if self.engine.access_code.trim().is_empty() {
            return Err(BotError::Config("access code must not be empty".to_string()));
        }
        if self.engine.access_code.trim() != self.engine.access_code {
            return Err(BotError::Config(
                "access code must not start or end with whitespace".to_string(),
            ));
        }
        if self.engine.batch_size == 0 {
            return Err(BotError::Config("batch size must be at least 1".to_string()));
        }
        if self.engine.fuzzy_window == 0 {
            return Err(BotError::Config("fuzzy window must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Open the registry. An existing database is served read-only; a
    /// missing one is created only when `create_if_missing` is set.
    pub fn open_registry(&self) -> Result<SqliteStore, BotError> {
        if self.database.exists() {
            return Ok(SqliteStore::open_read_only(&self.database)?);
        }
        if !self.create_if_missing {
            return Err(BotError::Config(format!(
                "registry {} not found (use --init to create an empty one)",
                self.database.display()
            )));
        }

        warn!(database = %self.database.display(), "creating empty registry");
        Ok(SqliteStore::open(&self.database)?)
    }
}
