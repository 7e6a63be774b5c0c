//! SQLite-backed entity storage
//!
//! One database file per entity (`<Name>.db` under the store directory),
//! one connection per call, no transactions spanning calls. The
//! reconciler consumes only the model shape; it never sees source text.
//!
//! Migration statement failures propagate: a failed DDL statement leaves
//! storage in the pre-migration state, not a half-migrated one. Row-level
//! seeding failures are non-fatal and skipped per row.

mod mapping;
mod reconcile;
mod rows;
mod seed;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;

pub use mapping::sqlite_type;
pub use reconcile::{ReconcileAction, ReconcileReport};
pub use rows::Row;
pub use seed::{RowSynthesizer, SampleValues};

/// Rows inserted when a table is first created.
pub const SEED_ROW_COUNT: usize = 15;

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite-level failure (including failed migration DDL).
    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error creating or inspecting the store directory.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A row operation needed an id column and the table has none of the
    /// conventional spellings.
    #[error("table {0} has no recognized id column")]
    NoIdColumn(String),
}

/// Per-entity SQLite storage rooted at one directory.
pub struct EntityStore {
    db_dir: PathBuf,
}

impl EntityStore {
    /// Open a store rooted at `db_dir`, creating the directory if needed.
    pub fn new(db_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let db_dir = db_dir.into();
        fs::create_dir_all(&db_dir)?;
        Ok(Self { db_dir })
    }

    /// The database file backing one entity. Entities never share a file,
    /// so reconcile calls for different entities never contend.
    pub fn db_path(&self, entity_name: &str) -> PathBuf {
        self.db_dir.join(format!("{entity_name}.db"))
    }

    pub fn dir(&self) -> &Path {
        &self.db_dir
    }

    /// One connection per call, scoped to that call.
    pub(crate) fn open(&self, entity_name: &str) -> Result<Connection, StoreError> {
        Ok(Connection::open(self.db_path(entity_name))?)
    }
}
