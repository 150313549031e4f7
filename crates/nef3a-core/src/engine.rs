//! Request handling
//!
//! [`Engine::handle`] is the boundary between the messaging channel and the
//! lookup kernel. It gates unauthorized senders, routes commands, runs
//! searches, and turns every failure into a reply. Nothing it does can take
//! the process down.
//!
//! The engine does not serialize requests itself. Hosts must not run two
//! requests for the same sender concurrently; different senders are
//! independent.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::classify::{classify, QueryIntent};
use crate::fuzzy::{FuzzyMatcher, DEFAULT_FUZZY_WINDOW};
use crate::lookup::Executor;
use crate::paginate::{Batch, Paginator, DEFAULT_BATCH_SIZE};
use crate::render::render_record;
use crate::session::{SenderId, SessionStore};
use crate::storage::{QueryStore, StoreError};

/// User-facing reply texts.
pub mod replies {
    pub const GATE: &str = "🔐 Please enter the access code to use the bot.";
    pub const ACCESS_GRANTED: &str = "✅ Access granted! Now send a plate, name, phone, or DOB.";
    pub const WELCOME: &str =
        "👋 Welcome! Send a plate (with or without letter), phone, name, or DOB to search.";
    pub const NO_RESULTS: &str = "❌ No results found.";
    pub const MORE_HINT: &str = "🔄 Send 'more' to load more results.";
    pub const NOTHING_PENDING: &str = "❗ No more results to show.";
    pub const STORE_UNAVAILABLE: &str = "⚠️ Search is unavailable right now. Please try again later.";
    pub const NOT_ADMIN: &str = "🚫 You are not authorized.";
    pub const UNKNOWN_COMMAND: &str = "❓ Unknown command. Send a plate, phone, name, or DOB to search.";
}

/// Command that pages through pending results.
pub const MORE_COMMAND: &str = "more";

/// Default number of searches kept for the admin panel.
pub const DEFAULT_RECENT_SEARCHES: usize = 10;

/// Errors surfaced by request handling. Each maps to a reply.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The record store failed; the sender gets a generic message.
    #[error("record store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// `more` with no pending results.
    #[error("no pending results")]
    NothingPending,

    /// Sender has not supplied the access code yet.
    #[error("sender is not authorized")]
    Unauthorized,
}

impl EngineError {
    pub fn reply(&self) -> &'static str {
        match self {
            EngineError::StoreUnavailable(_) => replies::STORE_UNAVAILABLE,
            EngineError::NothingPending => replies::NOTHING_PENDING,
            EngineError::Unauthorized => replies::GATE,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Code a sender must send once to unlock the bot.
    pub access_code: String,
    /// Sender allowed to open the admin panel.
    pub admin_id: Option<SenderId>,
    pub batch_size: usize,
    pub fuzzy_window: usize,
    /// Searches kept in memory for the admin panel.
    pub recent_searches: usize,
}

impl EngineConfig {
    pub fn new(access_code: impl Into<String>) -> Self {
        Self {
            access_code: access_code.into(),
            admin_id: None,
            batch_size: DEFAULT_BATCH_SIZE,
            fuzzy_window: DEFAULT_FUZZY_WINDOW,
            recent_searches: DEFAULT_RECENT_SEARCHES,
        }
    }

    pub fn with_admin(mut self, admin_id: SenderId) -> Self {
        self.admin_id = Some(admin_id);
        self
    }
}

/// One inbound message from the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub sender: SenderId,
    pub text: String,
}

impl Inbound {
    pub fn new(sender: SenderId, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }
}

/// A search as shown on the admin panel.
#[derive(Debug, Clone)]
pub struct RecentSearch {
    pub at: DateTime<Utc>,
    pub sender: SenderId,
    pub text: String,
    pub kind: &'static str,
    pub hits: usize,
}

/// The lookup engine.
pub struct Engine<S, A> {
    store: S,
    sessions: A,
    executor: Executor,
    paginator: Paginator,
    config: EngineConfig,
    recent: Mutex<VecDeque<RecentSearch>>,
}

impl<S: QueryStore, A: SessionStore> Engine<S, A> {
    pub fn new(store: S, sessions: A, config: EngineConfig) -> Self {
        Self {
            store,
            sessions,
            executor: Executor::new(FuzzyMatcher::new(config.fuzzy_window)),
            paginator: Paginator::new(config.batch_size),
            config,
            recent: Mutex::new(VecDeque::new()),
        }
    }

    pub fn sessions(&self) -> &A {
        &self.sessions
    }

    /// Handle one inbound message and return the reply blocks in send order.
    pub fn handle(&self, inbound: &Inbound) -> Vec<String> {
        let sender = inbound.sender;
        let text = inbound.text.trim();

        if !self.sessions.is_authorized(sender) {
            return self.unlock(sender, text);
        }

        match self.dispatch(sender, text) {
            Ok(replies) => replies,
            Err(err) => {
                if let EngineError::StoreUnavailable(cause) = &err {
                    error!(sender, error = %cause, "search failed");
                }
                vec![err.reply().to_string()]
            }
        }
    }

    fn unlock(&self, sender: SenderId, text: &str) -> Vec<String> {
        if !self.config.access_code.is_empty() && text == self.config.access_code {
            self.sessions.authorize(sender);
            info!(sender, "access granted");
            return vec![replies::ACCESS_GRANTED.to_string()];
        }

        warn!(sender, "message from unauthorized sender");
        vec![EngineError::Unauthorized.reply().to_string()]
    }

    fn dispatch(&self, sender: SenderId, text: &str) -> Result<Vec<String>, EngineError> {
        if text.eq_ignore_ascii_case(MORE_COMMAND) {
            return self.more(sender);
        }

        match text {
            "/start" => Ok(vec![replies::WELCOME.to_string()]),
            "/admin" => Ok(vec![self.admin_panel(sender)]),
            cmd if cmd.starts_with('/') => Ok(vec![replies::UNKNOWN_COMMAND.to_string()]),
            query => self.search(sender, query),
        }
    }

    /// Run a search for an authorized sender and deliver the first batch.
    pub fn search(&self, sender: SenderId, text: &str) -> Result<Vec<String>, EngineError> {
        let Some(intent) = classify(text) else {
            return Ok(vec![replies::WELCOME.to_string()]);
        };

        let results = self.executor.execute(&self.store, &intent)?;
        info!(sender, intent = intent.kind(), hits = results.len(), "search");
        self.record_search(sender, text, &intent, results.len());

        if results.is_empty() {
            return Ok(vec![replies::NO_RESULTS.to_string()]);
        }

        let mut session = self.sessions.session(sender);
        let batch = self.paginator.deliver(&mut session, results);
        self.sessions.set_session(sender, session);

        Ok(render_batch(&batch))
    }

    /// Deliver the next batch of the sender's pending results.
    pub fn more(&self, sender: SenderId) -> Result<Vec<String>, EngineError> {
        let mut session = self.sessions.session(sender);
        let batch = self
            .paginator
            .resume(&mut session)
            .ok_or(EngineError::NothingPending)?;
        self.sessions.set_session(sender, session);

        Ok(render_batch(&batch))
    }

    fn record_search(&self, sender: SenderId, text: &str, intent: &QueryIntent, hits: usize) {
        if self.config.recent_searches == 0 {
            return;
        }
        let mut recent = self.recent.lock();
        recent.push_front(RecentSearch {
            at: Utc::now(),
            sender,
            text: text.to_string(),
            kind: intent.kind(),
            hits,
        });
        recent.truncate(self.config.recent_searches);
    }

    /// Most recent searches, newest first.
    pub fn recent_searches(&self) -> Vec<RecentSearch> {
        self.recent.lock().iter().cloned().collect()
    }

    fn admin_panel(&self, sender: SenderId) -> String {
        if self.config.admin_id != Some(sender) {
            return replies::NOT_ADMIN.to_string();
        }

        let searches = self.recent_searches();
        let log = if searches.is_empty() {
            "(No searches yet)".to_string()
        } else {
            searches
                .iter()
                .map(|s| {
                    format!(
                        "{} | {} | {} [{}] -> {}",
                        s.at.format("%Y-%m-%d %H:%M:%S"),
                        s.sender,
                        s.text,
                        s.kind,
                        s.hits
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let senders = self.sessions.authorized_senders();
        let users = if senders.is_empty() {
            "(None)".to_string()
        } else {
            senders
                .iter()
                .map(|id| format!("• {}", id))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "🧾 Last {} Searches:\n{}\n\n👥 Users:\n{}",
            self.config.recent_searches, log, users
        )
    }
}

fn render_batch(batch: &Batch) -> Vec<String> {
    let mut blocks: Vec<String> = batch.records.iter().map(render_record).collect();
    if batch.more_available {
        blocks.push(replies::MORE_HINT.to_string());
    }
    blocks
}
