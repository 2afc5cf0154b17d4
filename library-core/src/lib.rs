//! Core library for the library catalog.
//!
//! This crate provides the author/book models and the SQLite-backed
//! repository, independent of any transport layer.
//!
//! # Usage
//!
//! ```no_run
//! use library_core::db::Database;
//! use library_core::models::BookSort;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let books = db.get_all_books_with_authors_order_by(BookSort::Title)?;
//! # Ok::<(), library_core::db::DbError>(())
//! ```

pub mod db;
pub mod models;

// Re-export commonly used types at crate root
pub use db::{Database, DbError, DbResult};
