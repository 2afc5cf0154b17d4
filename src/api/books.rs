use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form, Json,
};
use serde::Deserialize;

use super::{ApiError, BookEntry, MessageResponse};
use crate::isbn;
use crate::models::{BookSort, BookWithAuthor, NewBook};
use library_core::{Database, DbError};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub sort_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct AddBookForm {
    pub isbn: String,
    pub title: String,
    pub publication_year: String,
    pub author_id: String,
}

fn entries(rows: Vec<BookWithAuthor>) -> Json<Vec<BookEntry>> {
    Json(rows.into_iter().map(BookEntry::from).collect())
}

/// Unknown or missing `sort_by` values fall back to author/title order.
pub async fn list_books(
    State(db): State<Database>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BookEntry>>, ApiError> {
    let rows = match query.sort_by.as_deref().and_then(BookSort::from_query) {
        Some(sort) => db.get_all_books_with_authors_order_by(sort)?,
        None => db.get_all_books_with_authors()?,
    };
    Ok(entries(rows))
}

pub async fn search_books(
    State(db): State<Database>,
    Form(form): Form<SearchForm>,
) -> Result<Json<Vec<BookEntry>>, ApiError> {
    let rows = db.get_all_books_with_authors_by_title(&form.title)?;
    Ok(entries(rows))
}

pub async fn delete_book(
    State(db): State<Database>,
    Path(book_id): Path<i64>,
) -> Result<Redirect, ApiError> {
    if let Some(book) = db.delete_book_by_id(book_id)? {
        tracing::info!("Deleted book {} ({})", book.id, book.title);
    }
    Ok(Redirect::to("/"))
}

pub async fn add_book(
    State(db): State<Database>,
    Form(form): Form<AddBookForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let title = form.title.trim();

    if !isbn::is_valid(&form.isbn) {
        return Ok(Json(MessageResponse::rejected(format!(
            "The book {} with ISBN: {} is not valid!",
            title, form.isbn
        ))));
    }
    if title.is_empty() {
        return Ok(Json(MessageResponse::rejected(
            "The book title must not be empty!",
        )));
    }

    let author = match form.author_id.trim().parse::<i64>() {
        Ok(id) => db.get_author_by_id(id)?,
        Err(_) => None,
    };
    let Some(author) = author else {
        return Ok(Json(MessageResponse::rejected(format!(
            "The author with id {} does not exist!",
            form.author_id
        ))));
    };

    let code = isbn::canonical(&form.isbn);
    if db.book_isbn_exists(&code)? {
        return Ok(Json(MessageResponse::rejected(format!(
            "The ISBN code: {} already exists in the database!",
            code
        ))));
    }
    if db.book_exists_by_author_and_title(author.id, title)? {
        return Ok(Json(MessageResponse::rejected(format!(
            "The book {} from {} already exists in the database!",
            title, author.name
        ))));
    }

    let input = NewBook {
        isbn: code,
        title: title.to_string(),
        publication_year: form.publication_year,
        author_id: author.id.to_string(),
    };
    match db.add_book(input) {
        Ok(book) => {
            tracing::info!("Added book {} ({})", book.id, book.title);
            Ok(Json(MessageResponse::added(format!(
                "The book {} from {} has been added successfully!",
                title, author.name
            ))))
        }
        Err(err @ (DbError::ConstraintViolation(_) | DbError::InvalidInput(_))) => {
            Ok(Json(MessageResponse::rejected(format!(
                "Error: {}: The book {} from {} has not been added!",
                err, title, author.name
            ))))
        }
        Err(err) => Err(err.into()),
    }
}
