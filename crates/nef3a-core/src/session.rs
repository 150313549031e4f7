//! Per-sender session state
//!
//! A session carries the sender's authorization flag and the pending results
//! of their last search. Sessions live for the process lifetime; only the
//! pending results are ever cleared.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::record::Record;

/// Stable per-sender identifier supplied by the messaging channel.
pub type SenderId = i64;

/// Authorization and pagination state for one sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Set once by a correct access code, never revoked.
    pub authorized: bool,
    /// Results of the last search, structured matches before fuzzy matches.
    pub pending: Vec<Record>,
    /// Offset of the next record to deliver.
    pub cursor: usize,
}

impl Session {
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop pending results and reset the cursor.
    pub fn clear_results(&mut self) {
        self.pending.clear();
        self.cursor = 0;
    }
}

/// Session state keyed by sender.
///
/// Implementations are shared across concurrent requests. Callers serialize
/// work per sender, so a read-modify-write of one sender's session never
/// races with another request for the same sender.
pub trait SessionStore: Send + Sync {
    fn is_authorized(&self, sender: SenderId) -> bool;

    /// Mark the sender as authorized for the rest of the process lifetime.
    fn authorize(&self, sender: SenderId);

    /// Current session, a fresh default one on first contact.
    fn session(&self, sender: SenderId) -> Session;

    fn set_session(&self, sender: SenderId, session: Session);

    /// All authorized senders, sorted.
    fn authorized_senders(&self) -> Vec<SenderId>;
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SenderId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of senders seen so far.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn is_authorized(&self, sender: SenderId) -> bool {
        self.sessions
            .read()
            .get(&sender)
            .is_some_and(|s| s.authorized)
    }

    fn authorize(&self, sender: SenderId) {
        self.sessions.write().entry(sender).or_default().authorized = true;
    }

    fn session(&self, sender: SenderId) -> Session {
        self.sessions
            .write()
            .entry(sender)
            .or_default()
            .clone()
    }

    fn set_session(&self, sender: SenderId, mut session: Session) {
        let mut sessions = self.sessions.write();
        let entry = sessions.entry(sender).or_default();
        // Authorization is sticky even if a stale copy is written back.
        session.authorized |= entry.authorized;
        *entry = session;
    }

    fn authorized_senders(&self) -> Vec<SenderId> {
        let mut senders: Vec<SenderId> = self
            .sessions
            .read()
            .iter()
            .filter(|(_, s)| s.authorized)
            .map(|(id, _)| *id)
            .collect();
        senders.sort_unstable();
        senders
    }
}
