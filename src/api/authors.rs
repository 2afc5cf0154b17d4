use axum::{extract::State, Form, Json};
use serde::Deserialize;

use super::{ApiError, AuthorEntry, MessageResponse};
use crate::dates::{display_date, parse_date, storage_date};
use library_core::{Database, DbError};

#[derive(Debug, Deserialize)]
pub struct AddAuthorForm {
    pub name: String,
    pub birthdate: String,
    /// Empty when the author is living.
    #[serde(default)]
    pub date_of_death: String,
}

/// Authors by name, for picking the author of a new book.
pub async fn list_authors(
    State(db): State<Database>,
) -> Result<Json<Vec<AuthorEntry>>, ApiError> {
    let authors = db.get_all_authors()?;
    Ok(Json(authors.into_iter().map(AuthorEntry::from).collect()))
}

/// Blank form state; nothing has been submitted yet.
pub async fn add_author_form() -> Json<MessageResponse> {
    Json(MessageResponse::default())
}

pub async fn add_author(
    State(db): State<Database>,
    Form(form): Form<AddAuthorForm>,
) -> Result<Json<MessageResponse>, ApiError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(Json(MessageResponse::rejected(
            "The author name must not be empty!",
        )));
    }

    let Some(born) = parse_date(&form.birthdate) else {
        return Ok(Json(MessageResponse::rejected(format!(
            "The birth date {} of the author {} is not valid!",
            form.birthdate, name
        ))));
    };

    let died = if form.date_of_death.trim().is_empty() {
        None
    } else {
        match parse_date(&form.date_of_death) {
            Some(date) => Some(date),
            None => {
                return Ok(Json(MessageResponse::rejected(format!(
                    "The date of death {} of the author {} is not valid!",
                    form.date_of_death, name
                ))))
            }
        }
    };

    let birth_date = storage_date(born);
    let date_of_death = died.map(storage_date);

    if db.author_exists(name, &birth_date, date_of_death.as_deref())? {
        return Ok(Json(MessageResponse::rejected(format!(
            "The author {} with the birth date {} already exists!",
            name,
            display_date(born)
        ))));
    }
    if let Some(died) = died {
        if died < born {
            return Ok(Json(MessageResponse::rejected(format!(
                "The author {} date of death {} is before date of birth {}!",
                name,
                display_date(died),
                display_date(born)
            ))));
        }
    }

    match db.add_author(name, &birth_date, date_of_death.as_deref()) {
        Ok(author) => {
            tracing::info!("Added author {} ({})", author.id, author.name);
            Ok(Json(MessageResponse::added(format!(
                "The author {} with the birth date {} has been added successfully!",
                name,
                display_date(born)
            ))))
        }
        Err(err @ DbError::ConstraintViolation(_)) => Ok(Json(MessageResponse::rejected(format!(
            "Error: {}: The author {} with the birth date {} has not been added!",
            err,
            name,
            display_date(born)
        )))),
        Err(err) => Err(err.into()),
    }
}
