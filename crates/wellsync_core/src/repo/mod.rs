//! Store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define keyed persistence for facilities, contacts and wells.
//! - Keep SQL details out of the services and the reconciliation engine.
//!
//! # Invariants
//! - Write paths validate models before any SQL mutation.
//! - Multi-row writes (`save_details`, `delete_facility_cascade`,
//!   `replace_well_records`) run inside one IMMEDIATE transaction.
//! - Repository APIs report `NotFound` separately from transport errors.

pub mod facility_repo;
pub mod well_repo;

use facility_repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Fails with a `MissingRequired*` error unless every `(table, columns)`
/// pair exists on `conn`.
pub(crate) fn ensure_schema(
    conn: &Connection,
    required: &[(&'static str, &[&'static str])],
) -> RepoResult<()> {
    for &(table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
