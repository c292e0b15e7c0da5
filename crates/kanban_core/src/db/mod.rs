//! Opening the kanban database file.
//!
//! # Responsibility
//! - Create the database location and open the single SQLite file.
//! - Bootstrap the collection and task tables on first use.
//!
//! # Invariants
//! - The schema stamp lives in `PRAGMA user_version`.
//! - Foreign keys are enforced, so tasks can never outlive their collection.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The directory holding the database file could not be created.
    Io(std::io::Error),
    /// The file was stamped by a newer kanban build.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    /// The file carries a schema stamp but lacks one of the kanban tables.
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "cannot prepare database location: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "kanban database uses schema {found}, this build reads up to schema {supported}"
            ),
            Self::MissingTable(table) => {
                write!(f, "kanban database is missing the '{table}' table")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
