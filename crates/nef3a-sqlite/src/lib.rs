//! SQLite storage backend for the nef3a registry
//!
//! This crate provides a persistent SQLite implementation of the nef3a-core
//! storage traits over the `CARMDI` registry table.
//!
//! # Features
//!
//! - Implements `RecordStore` and `QueryStore` traits
//! - Reads registry exports whose numeric columns use integer affinity
//! - Supports in-memory databases for testing
//! - Read-only mode for serving a production export
//!
//! # Example
//!
//! ```rust,no_run
//! use nef3a_sqlite::SqliteStore;
//! use nef3a_core::{storage::{QueryStore, RecordPredicate, RecordStore}, RecordBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::in_memory()?;
//! store.put(RecordBuilder::new("123456").suffix("B").make("Toyota").build())?;
//!
//! let hits = store.query(&RecordPredicate::VehicleContains("toyo".into()))?;
//! assert_eq!(hits.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod schema;
pub mod store;

// Re-export main types
pub use error::{Result, SqliteError};
pub use store::SqliteStore;
