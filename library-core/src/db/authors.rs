use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use super::{Database, DbResult};
use crate::models::Author;

pub(crate) const AUTHOR_COLUMNS: &str = "id, name, birth_date, date_of_death";

/// Maps the four author columns starting at `offset`.
pub(crate) fn author_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        birth_date: row.get(offset + 2)?,
        date_of_death: row.get(offset + 3)?,
    })
}

fn find_author(conn: &Connection, id: i64) -> DbResult<Option<Author>> {
    let author = conn
        .query_row(
            &format!("SELECT {AUTHOR_COLUMNS} FROM authors WHERE id = ?1"),
            params![id],
            |row| author_from_row(row, 0),
        )
        .optional()?;
    Ok(author)
}

/// Deletes the author when no book references it any more.
///
/// The delete runs in a savepoint, so a failure here undoes only this step
/// and leaves the caller's transaction usable.
pub(crate) fn remove_author_if_orphaned_in(
    tx: &mut Transaction<'_>,
    author_id: i64,
) -> DbResult<bool> {
    let remaining: i64 = tx.query_row(
        "SELECT COUNT(*) FROM books WHERE author_id = ?1",
        params![author_id],
        |row| row.get(0),
    )?;
    if remaining > 0 {
        return Ok(false);
    }

    let sp = tx.savepoint()?;
    let deleted = sp.execute("DELETE FROM authors WHERE id = ?1", params![author_id])?;
    sp.commit()?;
    Ok(deleted > 0)
}

impl Database {
    pub fn add_author(
        &self,
        name: &str,
        birth_date: &str,
        date_of_death: Option<&str>,
    ) -> DbResult<Author> {
        let author = self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO authors (name, birth_date, date_of_death) VALUES (?1, ?2, ?3)",
                params![name, birth_date, date_of_death],
            )?;

            Ok(Author {
                id: tx.last_insert_rowid(),
                name: name.to_string(),
                birth_date: birth_date.to_string(),
                date_of_death: date_of_death.map(str::to_string),
            })
        })?;

        tracing::debug!("Added author {} ({})", author.id, author);
        Ok(author)
    }

    /// Exact match on all three fields; a `None` death date only matches
    /// authors stored without one.
    pub fn author_exists(
        &self,
        name: &str,
        birth_date: &str,
        date_of_death: Option<&str>,
    ) -> DbResult<bool> {
        self.with_transaction(|tx| {
            let exists = tx.query_row(
                "SELECT EXISTS (
                    SELECT 1 FROM authors
                    WHERE name = ?1 AND birth_date = ?2 AND date_of_death IS ?3
                )",
                params![name, birth_date, date_of_death],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    pub fn get_all_authors(&self) -> DbResult<Vec<Author>> {
        self.with_transaction(|tx| {
            let mut stmt =
                tx.prepare(&format!("SELECT {AUTHOR_COLUMNS} FROM authors ORDER BY name, id"))?;
            let authors = stmt
                .query_map([], |row| author_from_row(row, 0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(authors)
        })
    }

    pub fn get_author_by_id(&self, id: i64) -> DbResult<Option<Author>> {
        self.with_transaction(|tx| find_author(tx, id))
    }

    /// Second step of a book delete: removes the author if it has no books
    /// left. Returns whether an author row was deleted.
    pub fn remove_author_if_orphaned(&self, author_id: i64) -> DbResult<bool> {
        let removed = self.with_transaction(|tx| remove_author_if_orphaned_in(tx, author_id))?;
        if removed {
            tracing::debug!("Removed orphaned author {}", author_id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;

    fn setup_db() -> Database {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[test]
    fn add_author_assigns_ids() {
        let db = setup_db();
        let first = db.add_author("Jane Doe", "1970-01-01", None).unwrap();
        let second = db
            .add_author("John Roe", "1901-02-03", Some("1980-04-05"))
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(db.get_author_by_id(second.id).unwrap(), Some(second));
    }

    #[test]
    fn duplicate_author_is_rejected_and_rolled_back() {
        let db = setup_db();
        db.add_author("Jane Doe", "1970-01-01", None).unwrap();

        let err = db.add_author("Jane Doe", "1970-01-01", None).unwrap_err();

        assert!(matches!(err, DbError::ConstraintViolation(_)));
        assert_eq!(db.get_all_authors().unwrap().len(), 1);
    }

    #[test]
    fn same_name_with_different_dates_is_allowed() {
        let db = setup_db();
        db.add_author("Jane Doe", "1970-01-01", None).unwrap();
        db.add_author("Jane Doe", "1970-01-01", Some("2000-01-01"))
            .unwrap();
        db.add_author("Jane Doe", "1971-01-01", None).unwrap();

        assert_eq!(db.get_all_authors().unwrap().len(), 3);
    }

    #[test]
    fn author_exists_distinguishes_death_date() {
        let db = setup_db();
        db.add_author("Jane Doe", "1970-01-01", None).unwrap();

        assert!(db.author_exists("Jane Doe", "1970-01-01", None).unwrap());
        assert!(!db
            .author_exists("Jane Doe", "1970-01-01", Some("2000-01-01"))
            .unwrap());
        assert!(!db.author_exists("Jane", "1970-01-01", None).unwrap());
    }

    #[test]
    fn remove_author_if_orphaned_keeps_authors_with_books() {
        let db = setup_db();
        let author = db.add_author("Jane Doe", "1970-01-01", None).unwrap();
        db.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO books (isbn, title, publication_year, author_id)
                 VALUES ('0306406152', 'Alpha', 2001, ?1)",
                params![author.id],
            )?;
            Ok(())
        })
        .unwrap();

        assert!(!db.remove_author_if_orphaned(author.id).unwrap());
        assert!(db.get_author_by_id(author.id).unwrap().is_some());
    }

    #[test]
    fn remove_author_if_orphaned_deletes_lonely_author() {
        let db = setup_db();
        let author = db.add_author("Jane Doe", "1970-01-01", None).unwrap();

        assert!(db.remove_author_if_orphaned(author.id).unwrap());
        assert!(db.get_author_by_id(author.id).unwrap().is_none());
        assert!(!db.remove_author_if_orphaned(author.id).unwrap());
    }
}
