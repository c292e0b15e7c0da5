//! Kanban schema bootstrap.
//!
//! A fresh file gets both tables and is stamped with `SCHEMA_VERSION`.
//! A stamped file must already carry both tables; a file stamped by a newer
//! build is refused rather than read with the wrong column layout.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Schema version written to `PRAGMA user_version` by this build.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Every table the repositories read from.
const KANBAN_TABLES: [&str; 2] = ["collections", "tasks"];

/// Reads the version stamp of an open database. Zero means never bootstrapped.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Creates the collection and task tables on a fresh database, then checks
/// that a stamped database really holds them.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    if found < SCHEMA_VERSION {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA_SQL)?;
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
        tx.commit()?;
        info!("event=schema_create module=db status=ok from={found} to={SCHEMA_VERSION}");
    }

    for table in KANBAN_TABLES {
        if !table_exists(conn, table)? {
            return Err(DbError::MissingTable(table));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get::<_, bool>(0),
    )?)
}
