pub mod api;
pub mod dates;
pub mod isbn;

pub use library_core::{db, models};
