//! HTTP surface of the catalog.
//!
//! Handlers take form-encoded input the way the catalog's pages submit it and
//! answer with JSON. Lookups, checks and writes are all delegated to
//! [`Database`].

mod authors;
mod books;
mod error;

use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::dates::display_stored;
use crate::models::{Author, BookWithAuthor};
use library_core::Database;

pub use authors::AddAuthorForm;
pub use books::{AddBookForm, ListQuery, SearchForm};
pub use error::ApiError;

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/", get(books::list_books).post(books::search_books))
        .route(
            "/delete/{book_id}",
            get(books::delete_book).post(books::delete_book),
        )
        .route(
            "/add_author",
            get(authors::add_author_form).post(authors::add_author),
        )
        .route(
            "/add_book",
            get(authors::list_authors).post(books::add_book),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(db)
}

/// Author as shown to users, with dates in `MM/DD/YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorEntry {
    pub id: i64,
    pub name: String,
    pub birth_date: String,
    pub date_of_death: Option<String>,
}

impl From<Author> for AuthorEntry {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
            birth_date: display_stored(&author.birth_date),
            date_of_death: author.date_of_death.as_deref().map(display_stored),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub publication_year: i64,
    pub author: AuthorEntry,
}

impl From<BookWithAuthor> for BookEntry {
    fn from(row: BookWithAuthor) -> Self {
        Self {
            id: row.book.id,
            isbn: row.book.isbn,
            title: row.book.title,
            publication_year: row.book.publication_year,
            author: row.author.into(),
        }
    }
}

/// Outcome of an add form. Rejections are reported here, not as HTTP errors.
///
/// The default value is the blank state shown before anything is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn added(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
