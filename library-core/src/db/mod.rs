//! SQLite persistence for authors and books.
//!
//! [`Database`] is the only mutation and query boundary over the catalog.
//! Every public operation runs inside its own transaction that commits on
//! success and rolls back when dropped on an error path.

mod authors;
mod books;
mod schema;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use directories::ProjectDirs;
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use thiserror::Error;

pub use schema::SCHEMA;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// A unique, foreign-key, not-null or check rule rejected a write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Sqlite(rusqlite::Error),
    #[error("could not determine a data directory for the database")]
    DataDir,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("database connection lock was poisoned")]
    Poisoned,
}

impl DbError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            Self::ConstraintViolation(err.to_string())
        } else {
            Self::Sqlite(err)
        }
    }
}

/// Shared handle to the catalog database.
///
/// Cloning is cheap; all clones use the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::debug!("Opening database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_default() -> DbResult<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn open_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// `library.sqlite` inside the platform data directory.
    pub fn default_path() -> DbResult<PathBuf> {
        let dirs = ProjectDirs::from("", "", "library").ok_or(DbError::DataDir)?;
        Ok(dirs.data_dir().join("library.sqlite"))
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Creates missing tables and indexes. Safe to call on every start.
    pub fn migrate(&self) -> DbResult<()> {
        self.with_transaction(|tx| {
            tx.execute_batch(SCHEMA)?;
            Ok(())
        })
    }

    /// Runs `f` inside an immediate transaction.
    ///
    /// The transaction commits only when `f` returns `Ok`; any early return
    /// drops it, which rolls back every write made so far.
    pub(crate) fn with_transaction<T>(
        &self,
        f: impl FnOnce(&mut Transaction<'_>) -> DbResult<T>,
    ) -> DbResult<T> {
        let mut conn = self.conn.lock().map_err(|_| DbError::Poisoned)?;
        let mut tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&mut tx)?;
        tx.commit()?;
        Ok(value)
    }
}
