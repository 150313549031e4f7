//! In-memory storage backend
//!
//! A simple Vec-based implementation for testing and development.
//! Records keep insertion order, which stands in for the table's row order.

use crate::record::Record;
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::traits::{NameFilter, QueryStore, RecordPredicate, RecordStore};

/// In-memory record store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Create a memory store with initial records.
    ///
    /// # Panics
    ///
    /// Panics if a record is rejected by [`RecordStore::put`]. Fixtures with
    /// invalid records are a bug in the caller.
    pub fn with_records(records: Vec<Record>) -> Self {
        let mut store = Self::new();
        for record in records {
            if let Err(e) = store.put(record) {
                panic!("invalid fixture record: {}", e);
            }
        }
        store
    }
}

impl RecordStore for MemoryStore {
    fn put(&mut self, record: Record) -> StoreResult<()> {
        if record.plate_number.trim().is_empty() {
            return Err(StoreError::InvalidData("empty plate number".to_string()));
        }
        self.records.push(record);
        Ok(())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.records.len())
    }
}

impl QueryStore for MemoryStore {
    fn query(&self, predicate: &RecordPredicate) -> StoreResult<Vec<Record>> {
        Ok(self
            .records
            .iter()
            .filter(|r| matches_predicate(r, predicate))
            .cloned()
            .collect())
    }

    fn scan(&self, filter: NameFilter, limit: usize) -> StoreResult<Vec<Record>> {
        Ok(self
            .records
            .iter()
            .filter(|r| filter.accepts(r))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// ASCII case-insensitive substring test, matching SQLite's `LIKE`.
fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Check if a record matches the given predicate.
fn matches_predicate(record: &Record, predicate: &RecordPredicate) -> bool {
    match predicate {
        RecordPredicate::Plate { number, suffix } => {
            &record.plate_number == number && record.plate_suffix.as_ref() == Some(suffix)
        }
        RecordPredicate::PlateNumber(number) => &record.plate_number == number,
        RecordPredicate::PhoneContains(digits) => record
            .normalized_phone()
            .is_some_and(|phone| phone.contains(digits.as_str())),
        RecordPredicate::DateOfBirth(dob) => record.date_of_birth.as_ref() == Some(dob),
        RecordPredicate::VehicleContains(text) => [&record.make, &record.model]
            .into_iter()
            .flatten()
            .any(|field| contains_ignore_ascii_case(field, text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordBuilder;

    fn sample_store() -> MemoryStore {
        MemoryStore::with_records(vec![
            RecordBuilder::new("123456")
                .suffix("B")
                .phone("03/123-456")
                .make("Toyota")
                .model("Corolla")
                .build(),
            RecordBuilder::new("123456")
                .suffix("G")
                .given_name("Ahmed")
                .date_of_birth("15/03/1990")
                .build(),
            RecordBuilder::new("98765")
                .given_name("Samir")
                .family_name("Haddad")
                .make("Mercedes")
                .model("C200")
                .build(),
        ])
    }

    #[test]
    fn test_put_rejects_empty_plate() {
        let mut store = MemoryStore::new();
        let result = store.put(RecordBuilder::new("  ").build());
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    #[should_panic(expected = "invalid fixture record")]
    fn test_with_records_rejects_invalid_fixture() {
        MemoryStore::with_records(vec![
            RecordBuilder::new("123456").build(),
            RecordBuilder::new("").build(),
        ]);
    }

    #[test]
    fn test_query_plate_exact() {
        let store = sample_store();
        let hits = store
            .query(&RecordPredicate::Plate {
                number: "123456".into(),
                suffix: "G".into(),
            })
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].given_name.as_deref(), Some("Ahmed"));
    }

    #[test]
    fn test_query_plate_number() {
        let store = sample_store();
        let hits = store
            .query(&RecordPredicate::PlateNumber("123456".into()))
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_query_phone_ignores_separators() {
        let store = sample_store();
        let hits = store
            .query(&RecordPredicate::PhoneContains("3123456".into()))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].plate_suffix.as_deref(), Some("B"));
    }

    #[test]
    fn test_query_dob_is_verbatim() {
        let store = sample_store();
        assert_eq!(
            store
                .query(&RecordPredicate::DateOfBirth("15/03/1990".into()))
                .unwrap()
                .len(),
            1
        );
        assert!(store
            .query(&RecordPredicate::DateOfBirth("15/3/1990".into()))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_query_vehicle_make_or_model() {
        let store = sample_store();
        assert_eq!(
            store
                .query(&RecordPredicate::VehicleContains("toyo".into()))
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            store
                .query(&RecordPredicate::VehicleContains("C2".into()))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_scan_filters_and_limits() {
        let store = sample_store();
        assert_eq!(store.scan(NameFilter::AnyName, 100).unwrap().len(), 2);
        assert_eq!(store.scan(NameFilter::AnyName, 1).unwrap().len(), 1);

        let both = store.scan(NameFilter::BothNames, 100).unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].plate_number, "98765");
    }
}
