//! Storage abstraction for registry records
//!
//! The engine only reads from the registry. [`QueryStore`] is the read
//! interface it consumes; [`RecordStore`] adds the loading side used by
//! fixtures and import tooling. Implementations exist for:
//!
//! - **Memory**: In-memory storage for testing (`MemoryStore`)
//! - **SQLite**: The `CARMDI` table via rusqlite (`nef3a-sqlite` crate)
//!
//! # Example
//!
//! ```rust
//! use nef3a_core::storage::{MemoryStore, QueryStore, RecordPredicate, RecordStore};
//! use nef3a_core::RecordBuilder;
//!
//! let mut store = MemoryStore::new();
//! store.put(RecordBuilder::new("123456").suffix("B").build()).unwrap();
//!
//! let hits = store
//!     .query(&RecordPredicate::PlateNumber("123456".into()))
//!     .unwrap();
//! assert_eq!(hits.len(), 1);
//! ```

mod error;
mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::{NameFilter, QueryStore, RecordPredicate, RecordStore};
