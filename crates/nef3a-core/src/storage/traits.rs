//! Storage trait definitions

use crate::record::Record;
use crate::storage::error::StoreResult;

/// One equality or substring predicate over named registry fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordPredicate {
    /// `ActualNB = number AND CodeDesc = suffix`
    Plate { number: String, suffix: String },
    /// `ActualNB = number`
    PlateNumber(String),
    /// Phone with `/`, `-` and spaces removed contains these digits.
    PhoneContains(String),
    /// `AgeProp = value`, compared verbatim.
    DateOfBirth(String),
    /// Make OR model contains the text, ASCII case-insensitive.
    VehicleContains(String),
}

/// Coarse existence filter for the phonetic name scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFilter {
    /// Given name or family name present.
    AnyName,
    /// Given name and family name both present.
    BothNames,
}

impl NameFilter {
    pub fn accepts(&self, record: &Record) -> bool {
        match self {
            NameFilter::AnyName => record.has_any_name(),
            NameFilter::BothNames => record.full_name().is_some(),
        }
    }
}

/// Loading side of a record store.
pub trait RecordStore {
    /// Insert a record.
    fn put(&mut self, record: Record) -> StoreResult<()>;

    /// Total number of records.
    fn count(&self) -> StoreResult<usize>;
}

/// Read operations the lookup engine runs against the registry.
///
/// Implementations must be safe for concurrent reads; requests from
/// different senders may query at the same time.
pub trait QueryStore: Send + Sync {
    /// All records matching `predicate`, in store order. No match is an
    /// empty vec, not an error.
    fn query(&self, predicate: &RecordPredicate) -> StoreResult<Vec<Record>>;

    /// The first `limit` records accepted by `filter`, in store order.
    fn scan(&self, filter: NameFilter, limit: usize) -> StoreResult<Vec<Record>>;
}
