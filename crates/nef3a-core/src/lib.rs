//! nef3a Core Engine
//!
//! The lookup kernel behind the nef3a registry bot. Free-text requests are
//! classified into a [`QueryIntent`], executed against a [`QueryStore`]
//! (optionally widened by a phonetic name scan), and delivered to the sender
//! in fixed-size batches that the sender pages through with `more`.
//!
//! The crate performs no I/O of its own. Storage backends implement the
//! traits in [`storage`]; the messaging transport feeds [`Inbound`] events
//! into an [`Engine`] and forwards the returned text blocks.
//!
//! # Example
//!
//! ```rust
//! use nef3a_core::{Engine, EngineConfig, Inbound, MemorySessionStore, MemoryStore, RecordBuilder};
//!
//! let store = MemoryStore::with_records(vec![RecordBuilder::new("123456")
//!     .suffix("B")
//!     .given_name("Ahmed")
//!     .family_name("Khalil")
//!     .build()]);
//! let config = EngineConfig::new("s3cret");
//! let engine = Engine::new(store, MemorySessionStore::new(), config);
//!
//! engine.handle(&Inbound::new(7, "s3cret"));
//! let replies = engine.handle(&Inbound::new(7, "123456 b"));
//! assert!(replies[0].contains("123456 B"));
//! ```

pub mod classify;
pub mod engine;
pub mod fuzzy;
pub mod lookup;
pub mod paginate;
pub mod phonetic;
pub mod record;
pub mod render;
pub mod session;
pub mod storage;

// Re-export main types at crate root
pub use classify::{classify, QueryIntent};
pub use engine::{Engine, EngineConfig, EngineError, Inbound, RecentSearch};
pub use fuzzy::{FuzzyMatcher, DEFAULT_FUZZY_WINDOW};
pub use lookup::Executor;
pub use paginate::{Batch, Paginator, DEFAULT_BATCH_SIZE};
pub use phonetic::encode;
pub use record::{Record, RecordBuilder};
pub use session::{MemorySessionStore, SenderId, Session, SessionStore};
pub use storage::{MemoryStore, NameFilter, QueryStore, RecordPredicate, RecordStore, StoreError};
