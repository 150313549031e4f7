//! Phonetic name matching over a bounded scan window
//!
//! Names are not indexed phonetically in the registry, so matching means
//! encoding candidates one by one. The scan is capped at a fixed window of
//! rows from the store's existence filter; matches beyond the window are not
//! reachable.
//!
//! The sentinel code never matches. A query with nothing encodable skips the
//! scan, and blank names in the registry (`''`) are not candidates.

use tracing::debug;

use crate::phonetic::{encode, encode_pair, SENTINEL};
use crate::record::Record;
use crate::storage::{NameFilter, QueryStore, StoreResult};

/// Default number of candidate rows scanned per fuzzy pass.
pub const DEFAULT_FUZZY_WINDOW: usize = 100;

/// Scans a window of named records and keeps the phonetically equal ones.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    window: usize,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_WINDOW)
    }
}

impl FuzzyMatcher {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Records whose given name or family name sounds like `token`.
    pub fn match_single<S: QueryStore + ?Sized>(
        &self,
        store: &S,
        token: &str,
    ) -> StoreResult<Vec<Record>> {
        let wanted = encode(token);
        if wanted == SENTINEL {
            return Ok(Vec::new());
        }
        // Blank names encode to the sentinel and so never equal `wanted`
        self.scan_matching(store, NameFilter::AnyName, |record| {
            [&record.given_name, &record.family_name]
                .into_iter()
                .flatten()
                .any(|name| encode(name) == wanted)
        })
    }

    /// Records whose given + family name pair sounds like `first second`.
    pub fn match_full_name<S: QueryStore + ?Sized>(
        &self,
        store: &S,
        first: &str,
        second: &str,
    ) -> StoreResult<Vec<Record>> {
        if encode(first) == SENTINEL || encode(second) == SENTINEL {
            return Ok(Vec::new());
        }
        let wanted = encode_pair(first, second);
        self.scan_matching(store, NameFilter::BothNames, |record| {
            record
                .full_name()
                .is_some_and(|(given, family)| encode_pair(given, family) == wanted)
        })
    }

    fn scan_matching<S, F>(&self, store: &S, filter: NameFilter, accept: F) -> StoreResult<Vec<Record>>
    where
        S: QueryStore + ?Sized,
        F: Fn(&Record) -> bool,
    {
        let candidates = store.scan(filter, self.window)?;
        let scanned = candidates.len();
        let matches: Vec<Record> = candidates.into_iter().filter(|r| accept(r)).collect();

        debug!(
            ?filter,
            scanned,
            window = self.window,
            matched = matches.len(),
            "phonetic scan"
        );

        Ok(matches)
    }
}
