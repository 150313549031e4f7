//! Registry schema
//!
//! A database without the `CARMDI` table gets the table and its lookup
//! indexes in one transaction. A database that already has the table is an
//! upstream export and is left exactly as found.

use rusqlite::Connection;
use tracing::{debug, info};

use nef3a_core::record::columns;

use crate::error::{Result, SqliteError};

const CARMDI_SCHEMA: &str = include_str!("../sql/carmdi.sql");

/// Whether the registry table exists.
pub fn has_registry_table(conn: &Connection) -> Result<bool> {
    let exists = conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?")?
        .exists([columns::TABLE])?;
    Ok(exists)
}

/// Create the registry table unless it exists. Returns `true` when created.
pub fn ensure_schema(conn: &Connection) -> Result<bool> {
    if has_registry_table(conn)? {
        debug!(table = columns::TABLE, "registry table present, schema untouched");
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(CARMDI_SCHEMA)
        .map_err(|e| SqliteError::Schema(e.to_string()))?;
    tx.commit()?;

    info!(table = columns::TABLE, "created registry schema");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_objects(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT type || ':' || name FROM sqlite_master ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap()
    }

    #[test]
    fn test_fresh_database_gets_table_and_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(ensure_schema(&conn).unwrap());

        assert!(has_registry_table(&conn).unwrap());
        assert_eq!(
            schema_objects(&conn),
            vec!["table:CARMDI", "index:idx_carmdi_dob", "index:idx_carmdi_plate"]
        );
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(ensure_schema(&conn).unwrap());
        let before = schema_objects(&conn);

        assert!(!ensure_schema(&conn).unwrap());
        assert_eq!(schema_objects(&conn), before);
    }

    #[test]
    fn test_existing_export_is_left_as_found() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE CARMDI (
                 ActualNB INTEGER, CodeDesc TEXT, PRODDATE INTEGER, Prenom TEXT, Nom TEXT,
                 TelProp TEXT, MarqueDesc TEXT, TypeDesc TEXT, CouleurDesc TEXT,
                 Addresse TEXT, AgeProp TEXT, BirthPlace TEXT
             );
             INSERT INTO CARMDI (ActualNB, CodeDesc, Prenom, Nom) VALUES (123456, 'B', 'Ahmed', 'Khalil');",
        )
        .unwrap();

        assert!(!ensure_schema(&conn).unwrap());

        // No indexes or bookkeeping tables were added
        assert_eq!(schema_objects(&conn), vec!["table:CARMDI"]);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM CARMDI", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
