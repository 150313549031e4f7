//! SQLite storage backend implementing the registry store traits

use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row, ToSql};
use tracing::info;

use nef3a_core::{
    record::{columns, Record},
    storage::{NameFilter, QueryStore, RecordPredicate, RecordStore, StoreResult},
};

use crate::error::{Result, SqliteError};

/// Phone column with the registry's separators stripped, mirroring
/// [`Record::normalized_phone`].
const NORMALIZED_PHONE: &str = "REPLACE(REPLACE(REPLACE(TelProp, '/', ''), '-', ''), ' ', '')";

/// SQLite-backed registry store
///
/// The connection sits behind a mutex so the store can be shared across
/// request workers.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store from a connection
    ///
    /// The connection should already have the `CARMDI` table.
    /// Use [`crate::schema::ensure_schema`] to initialize a fresh database.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Create a new in-memory SQLite store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        crate::schema::ensure_schema(&conn)?;
        Ok(Self::new(conn))
    }

    /// Open (or create) a file-backed store for loading records
    ///
    /// The registry table is created when missing; an existing table is
    /// used as is.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        crate::schema::ensure_schema(&conn)?;
        Ok(Self::new(conn))
    }

    /// Open an existing registry export without writing to it
    pub fn open_read_only(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let store = Self::new(conn);
        info!(path = %path.display(), records = store.record_count()?, "opened registry read-only");
        Ok(store)
    }

    fn record_count(&self) -> Result<usize> {
        let count: i64 = self.conn.lock().query_row(
            &format!("SELECT COUNT(*) FROM {}", columns::TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn insert(&self, record: &Record) -> Result<()> {
        if record.plate_number.trim().is_empty() {
            return Err(SqliteError::InvalidRecord("empty plate number".to_string()));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            columns::TABLE,
            columns::ALL.join(", "),
            vec!["?"; columns::ALL.len()].join(", ")
        );
        self.conn.lock().execute(
            &sql,
            rusqlite::params![
                record.plate_number,
                record.plate_suffix,
                record.production_year,
                record.given_name,
                record.family_name,
                record.phone,
                record.make,
                record.model,
                record.color,
                record.address,
                record.date_of_birth,
                record.birthplace,
            ],
        )?;
        Ok(())
    }

    fn select(&self, where_clause: &str, params: &[&dyn ToSql], limit: Option<usize>) -> Result<Vec<Record>> {
        let mut sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY rowid",
            columns::ALL.join(", "),
            columns::TABLE,
            where_clause
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map(params, record_from_row)?
            .collect::<std::result::Result<Vec<Record>, rusqlite::Error>>()?;
        Ok(records)
    }
}

/// Read a column as text whatever its storage class. Registry exports store
/// plate numbers and years as integers.
fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    let text = match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    };
    Ok(text)
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        plate_number: text_column(row, 0)?.unwrap_or_default(),
        plate_suffix: text_column(row, 1)?,
        production_year: text_column(row, 2)?,
        given_name: text_column(row, 3)?,
        family_name: text_column(row, 4)?,
        phone: text_column(row, 5)?,
        make: text_column(row, 6)?,
        model: text_column(row, 7)?,
        color: text_column(row, 8)?,
        address: text_column(row, 9)?,
        date_of_birth: text_column(row, 10)?,
        birthplace: text_column(row, 11)?,
    })
}

/// `%text%` LIKE pattern with the wildcards in `text` escaped (`ESCAPE '\'`).
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl RecordStore for SqliteStore {
    fn put(&mut self, record: Record) -> StoreResult<()> {
        Ok(self.insert(&record)?)
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.record_count()?)
    }
}

impl QueryStore for SqliteStore {
    fn query(&self, predicate: &RecordPredicate) -> StoreResult<Vec<Record>> {
        let records = match predicate {
            RecordPredicate::Plate { number, suffix } => self.select(
                "ActualNB = ? AND CodeDesc = ?",
                &[number as &dyn ToSql, suffix],
                None,
            )?,
            RecordPredicate::PlateNumber(number) => {
                self.select("ActualNB = ?", &[number as &dyn ToSql], None)?
            }
            RecordPredicate::PhoneContains(digits) => {
                let pattern = contains_pattern(digits);
                self.select(
                    &format!("{} LIKE ? ESCAPE '\\'", NORMALIZED_PHONE),
                    &[&pattern as &dyn ToSql],
                    None,
                )?
            }
            RecordPredicate::DateOfBirth(dob) => {
                self.select("AgeProp = ?", &[dob as &dyn ToSql], None)?
            }
            RecordPredicate::VehicleContains(text) => {
                let pattern = contains_pattern(text);
                self.select(
                    "MarqueDesc LIKE ?1 ESCAPE '\\' OR TypeDesc LIKE ?1 ESCAPE '\\'",
                    &[&pattern as &dyn ToSql],
                    None,
                )?
            }
        };
        Ok(records)
    }

    fn scan(&self, filter: NameFilter, limit: usize) -> StoreResult<Vec<Record>> {
        let where_clause = match filter {
            NameFilter::AnyName => "Prenom IS NOT NULL OR Nom IS NOT NULL",
            NameFilter::BothNames => "Prenom IS NOT NULL AND Nom IS NOT NULL",
        };
        Ok(self.select(where_clause, &[], Some(limit))?)
    }
}
