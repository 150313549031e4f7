//! Batched result delivery
//!
//! A search stores its full result list in the sender's [`Session`] and hands
//! out the first batch. Each `more` hands out the next batch from the stored
//! cursor. The batch that reaches the end clears the session's results.

use crate::record::Record;
use crate::session::Session;

/// Records per delivered batch.
pub const DEFAULT_BATCH_SIZE: usize = 3;

/// One delivery step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub records: Vec<Record>,
    /// More records are pending after this batch.
    pub more_available: bool,
}

/// Splits result lists into fixed-size batches and tracks the cursor.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    batch_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl Paginator {
    /// A batch size of zero is treated as one.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Store `results` as the session's pending list and emit the first batch.
    pub fn deliver(&self, session: &mut Session, results: Vec<Record>) -> Batch {
        session.pending = results;
        session.cursor = 0;
        self.next_batch(session)
    }

    /// Emit the next batch from the stored cursor, or `None` when nothing is
    /// pending.
    pub fn resume(&self, session: &mut Session) -> Option<Batch> {
        if !session.has_pending() {
            return None;
        }
        Some(self.next_batch(session))
    }

    fn next_batch(&self, session: &mut Session) -> Batch {
        let start = session.cursor.min(session.pending.len());
        let end = (start + self.batch_size).min(session.pending.len());
        let records = session.pending[start..end].to_vec();

        let more_available = end < session.pending.len();
        if more_available {
            session.cursor = end;
        } else {
            session.clear_results();
        }

        Batch {
            records,
            more_available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordBuilder;
    use pretty_assertions::assert_eq;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| RecordBuilder::new(format!("{}", i)).build())
            .collect()
    }

    fn plates(batch: &Batch) -> Vec<String> {
        batch.records.iter().map(|r| r.plate_number.clone()).collect()
    }

    #[test]
    fn test_seven_results_in_three_batches() {
        let paginator = Paginator::default();
        let mut session = Session::default();

        let first = paginator.deliver(&mut session, records(7));
        assert_eq!(plates(&first), vec!["0", "1", "2"]);
        assert!(first.more_available);
        assert_eq!(session.cursor, 3);

        let second = paginator.resume(&mut session).unwrap();
        assert_eq!(plates(&second), vec!["3", "4", "5"]);
        assert!(second.more_available);
        assert_eq!(session.cursor, 6);

        let third = paginator.resume(&mut session).unwrap();
        assert_eq!(plates(&third), vec!["6"]);
        assert!(!third.more_available);
        assert!(session.pending.is_empty());
        assert_eq!(session.cursor, 0);

        assert!(paginator.resume(&mut session).is_none());
    }

    #[test]
    fn test_short_result_clears_immediately() {
        let paginator = Paginator::default();
        let mut session = Session::default();

        let batch = paginator.deliver(&mut session, records(2));
        assert_eq!(batch.records.len(), 2);
        assert!(!batch.more_available);
        assert!(!session.has_pending());
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_batch() {
        let paginator = Paginator::default();
        let mut session = Session::default();

        assert!(paginator.deliver(&mut session, records(6)).more_available);
        let last = paginator.resume(&mut session).unwrap();
        assert_eq!(last.records.len(), 3);
        assert!(!last.more_available);
        assert!(paginator.resume(&mut session).is_none());
    }

    #[test]
    fn test_new_search_resets_cursor() {
        let paginator = Paginator::default();
        let mut session = Session::default();

        paginator.deliver(&mut session, records(7));
        paginator.resume(&mut session);

        let fresh = paginator.deliver(&mut session, records(4));
        assert_eq!(plates(&fresh), vec!["0", "1", "2"]);
        assert_eq!(session.cursor, 3);
    }

    #[test]
    fn test_zero_batch_size_is_one() {
        assert_eq!(Paginator::new(0).batch_size(), 1);
    }
}
