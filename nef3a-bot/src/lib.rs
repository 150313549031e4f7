//! nef3a Bot
//!
//! Runs the lookup engine behind a line-oriented messaging channel. A
//! transport bridge writes one JSON object per inbound message to stdin and
//! reads one JSON object per reply batch from stdout.
//!
//! ## Module Structure
//!
//! - `config` - Bot configuration and validation
//! - `channel` - JSON-lines wire format and stdin/stdout pumps
//! - `service` - Per-sender workers driving the engine
//! - `error` - Bot error type

pub mod channel;
pub mod config;
pub mod error;
pub mod service;

pub use config::BotConfig;
pub use error::BotError;
pub use service::BotService;
