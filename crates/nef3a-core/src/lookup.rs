//! Intent execution against the record store
//!
//! Each intent maps to one store predicate, a phonetic name scan, or both.
//! For a single free-text token the substring matches on the vehicle fields
//! come first and the phonetic name matches are appended after them. A row
//! that satisfies both passes appears twice.

use crate::classify::QueryIntent;
use crate::fuzzy::FuzzyMatcher;
use crate::record::Record;
use crate::storage::{QueryStore, RecordPredicate, StoreResult};

/// Runs classified intents against a [`QueryStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor {
    fuzzy: FuzzyMatcher,
}

impl Executor {
    pub fn new(fuzzy: FuzzyMatcher) -> Self {
        Self { fuzzy }
    }

    /// The store predicate for an intent, `None` for phonetic-only intents.
    pub fn predicate(intent: &QueryIntent) -> Option<RecordPredicate> {
        let predicate = match intent {
            QueryIntent::PlateExact { number, suffix } => RecordPredicate::Plate {
                number: number.clone(),
                suffix: suffix.clone(),
            },
            QueryIntent::PlateNumberOnly(number) => RecordPredicate::PlateNumber(number.clone()),
            QueryIntent::PhoneDigits(digits) => RecordPredicate::PhoneContains(digits.clone()),
            QueryIntent::DateOfBirth(dob) => RecordPredicate::DateOfBirth(dob.clone()),
            QueryIntent::VehicleOrNameFuzzy(token) => {
                RecordPredicate::VehicleContains(token.clone())
            }
            QueryIntent::FullNameFuzzy { .. } => return None,
        };
        Some(predicate)
    }

    /// Execute `intent`. Zero matches is an empty vec.
    pub fn execute<S: QueryStore + ?Sized>(
        &self,
        store: &S,
        intent: &QueryIntent,
    ) -> StoreResult<Vec<Record>> {
        let mut results = match Self::predicate(intent) {
            Some(predicate) => store.query(&predicate)?,
            None => Vec::new(),
        };

        match intent {
            QueryIntent::VehicleOrNameFuzzy(token) => {
                results.extend(self.fuzzy.match_single(store, token)?);
            }
            QueryIntent::FullNameFuzzy { first, second } => {
                results.extend(self.fuzzy.match_full_name(store, first, second)?);
            }
            _ => {}
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::record::RecordBuilder;
    use crate::storage::{MemoryStore, NameFilter, StoreError};

    fn store() -> MemoryStore {
        MemoryStore::with_records(vec![
            RecordBuilder::new("123456")
                .suffix("B")
                .phone("03/123-456")
                .make("Toyota")
                .given_name("Tayota")
                .build(),
            RecordBuilder::new("123456")
                .suffix("G")
                .given_name("Ahmed")
                .family_name("Khalil")
                .date_of_birth("15/03/1990")
                .build(),
            RecordBuilder::new("555")
                .given_name("Samir")
                .family_name("Haddad")
                .make("Toyota")
                .build(),
        ])
    }

    fn run(raw: &str) -> Vec<Record> {
        let intent = classify(raw).unwrap();
        Executor::default().execute(&store(), &intent).unwrap()
    }

    fn plates(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| format!("{}{}", r.plate_number, r.plate_suffix.as_deref().unwrap_or("")))
            .collect()
    }

    #[test]
    fn test_plate_exact() {
        assert_eq!(plates(&run("123456 g")), vec!["123456G"]);
    }

    #[test]
    fn test_plate_number_only() {
        assert_eq!(plates(&run("123456")), vec!["123456B", "123456G"]);
    }

    #[test]
    fn test_phone() {
        assert_eq!(plates(&run("03123456")), vec!["123456B"]);
    }

    #[test]
    fn test_dob() {
        assert_eq!(plates(&run("15/03/1990")), vec!["123456G"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(run("99/99/9999").is_empty());
        assert!(run("Ferrari Enzo").is_empty());
    }

    #[test]
    fn test_vehicle_then_phonetic_without_dedup() {
        // Substring hits first (rows 1 and 3), then the phonetic hit on
        // row 1's given name "Tayota" (T300 == T300).
        assert_eq!(plates(&run("toyota")), vec!["123456B", "555", "123456B"]);
    }

    #[test]
    fn test_full_name_is_phonetic_only() {
        assert_eq!(plates(&run("Ahmad Kalil")), vec!["123456G"]);
    }

    #[test]
    fn test_arabic_indic_phone() {
        assert_eq!(plates(&run("٠٣١٢٣٤٥٦")), vec!["123456B"]);
    }

    #[test]
    fn test_symbols_do_not_match_blank_names() {
        let store = MemoryStore::with_records(vec![
            RecordBuilder::new("1").given_name("").family_name("").build(),
            RecordBuilder::new("2").given_name("").family_name("Haddad").build(),
            RecordBuilder::new("3").given_name("Samir").family_name("Haddad").build(),
        ]);

        for raw in ["+", "12-34", "%"] {
            let intent = classify(raw).unwrap();
            let hits = Executor::default().execute(&store, &intent).unwrap();
            assert!(hits.is_empty(), "input {:?} matched {:?}", raw, plates(&hits));
        }
    }

    struct FailingStore;

    impl QueryStore for FailingStore {
        fn query(&self, _: &RecordPredicate) -> StoreResult<Vec<Record>> {
            Err(StoreError::Backend("disk on fire".into()))
        }

        fn scan(&self, _: NameFilter, _: usize) -> StoreResult<Vec<Record>> {
            Err(StoreError::Backend("disk on fire".into()))
        }
    }

    #[test]
    fn test_store_errors_propagate() {
        let intent = classify("Ahmed Khalil").unwrap();
        let result = Executor::default().execute(&FailingStore, &intent);
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }
}
