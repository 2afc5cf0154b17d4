use rusqlite::{params, Connection, OptionalExtension, Row};

use super::authors::{author_from_row, remove_author_if_orphaned_in};
use super::{Database, DbError, DbResult};
use crate::models::{Book, BookSort, BookWithAuthor, NewBook};

const BOOK_COLUMNS: &str = "id, isbn, title, publication_year, author_id";

const BOOK_WITH_AUTHOR_SELECT: &str = "SELECT
    b.id, b.isbn, b.title, b.publication_year, b.author_id,
    a.id, a.name, a.birth_date, a.date_of_death
FROM books b
INNER JOIN authors a ON b.author_id = a.id";

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        isbn: row.get(1)?,
        title: row.get(2)?,
        publication_year: row.get(3)?,
        author_id: row.get(4)?,
    })
}

fn book_with_author_from_row(row: &Row<'_>) -> rusqlite::Result<BookWithAuthor> {
    Ok(BookWithAuthor {
        book: book_from_row(row)?,
        author: author_from_row(row, 5)?,
    })
}

fn query_books_with_authors(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> DbResult<Vec<BookWithAuthor>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, book_with_author_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn find_book(conn: &Connection, id: i64) -> DbResult<Option<Book>> {
    let book = conn
        .query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"),
            params![id],
            book_from_row,
        )
        .optional()?;
    Ok(book)
}

/// First step of a book delete. Returns the removed row, or `None` when
/// there was nothing to delete.
fn delete_book_in(conn: &Connection, id: i64) -> DbResult<Option<Book>> {
    let Some(book) = find_book(conn, id)? else {
        return Ok(None);
    };
    conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;
    Ok(Some(book))
}

fn parse_integer(field: &str, value: &str) -> DbResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| DbError::InvalidInput(format!("{field} must be an integer, got {value:?}")))
}

impl Database {
    pub fn book_isbn_exists(&self, isbn: &str) -> DbResult<bool> {
        self.with_transaction(|tx| {
            let exists = tx.query_row(
                "SELECT EXISTS (SELECT 1 FROM books WHERE isbn = ?1)",
                params![isbn],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    pub fn book_exists_by_author_and_title(&self, author_id: i64, title: &str) -> DbResult<bool> {
        self.with_transaction(|tx| {
            let exists = tx.query_row(
                "SELECT EXISTS (SELECT 1 FROM books WHERE author_id = ?1 AND title = ?2)",
                params![author_id, title],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    /// Inserts a book, coercing the year and author id to integers first.
    ///
    /// Unknown authors, duplicate ISBNs and duplicate titles per author are
    /// all reported as [`DbError::ConstraintViolation`].
    pub fn add_book(&self, input: NewBook) -> DbResult<Book> {
        let publication_year = parse_integer("publication year", &input.publication_year)?;
        let author_id = parse_integer("author id", &input.author_id)?;

        let book = self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO books (isbn, title, publication_year, author_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![input.isbn, input.title, publication_year, author_id],
            )?;

            Ok(Book {
                id: tx.last_insert_rowid(),
                isbn: input.isbn,
                title: input.title,
                publication_year,
                author_id,
            })
        })?;

        tracing::debug!("Added book {} ({})", book.id, book);
        Ok(book)
    }

    pub fn get_all_books(&self) -> DbResult<Vec<Book>> {
        self.with_transaction(|tx| {
            let mut stmt = tx.prepare(&format!(
                "SELECT {BOOK_COLUMNS} FROM books ORDER BY author_id, title, id"
            ))?;
            let books = stmt
                .query_map([], book_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(books)
        })
    }

    pub fn get_book_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        self.with_transaction(|tx| find_book(tx, id))
    }

    /// Every book with its author, by author name then title.
    pub fn get_all_books_with_authors(&self) -> DbResult<Vec<BookWithAuthor>> {
        self.with_transaction(|tx| {
            query_books_with_authors(
                tx,
                &format!("{BOOK_WITH_AUTHOR_SELECT} ORDER BY a.name, b.title, b.id"),
                [],
            )
        })
    }

    pub fn get_all_books_with_authors_order_by(
        &self,
        sort: BookSort,
    ) -> DbResult<Vec<BookWithAuthor>> {
        let sql = format!(
            "{BOOK_WITH_AUTHOR_SELECT} ORDER BY {}",
            sort.order_by_clause()
        );
        self.with_transaction(|tx| query_books_with_authors(tx, &sql, []))
    }

    pub fn get_all_books_with_authors_order_by_title(&self) -> DbResult<Vec<BookWithAuthor>> {
        self.get_all_books_with_authors_order_by(BookSort::Title)
    }

    pub fn get_all_books_with_authors_order_by_author(&self) -> DbResult<Vec<BookWithAuthor>> {
        self.get_all_books_with_authors_order_by(BookSort::AuthorName)
    }

    pub fn get_all_books_with_authors_order_by_publication_year(
        &self,
    ) -> DbResult<Vec<BookWithAuthor>> {
        self.get_all_books_with_authors_order_by(BookSort::PublicationYear)
    }

    /// Books whose title contains `substring` (case-sensitive), by title.
    ///
    /// `%` and `_` are matched literally.
    pub fn get_all_books_with_authors_by_title(
        &self,
        substring: &str,
    ) -> DbResult<Vec<BookWithAuthor>> {
        self.with_transaction(|tx| {
            query_books_with_authors(
                tx,
                &format!(
                    "{BOOK_WITH_AUTHOR_SELECT} WHERE instr(b.title, ?1) > 0 ORDER BY b.title, b.id"
                ),
                params![substring],
            )
        })
    }

    /// Deletes only the book row, without touching its author.
    pub fn delete_book(&self, id: i64) -> DbResult<Option<Book>> {
        self.with_transaction(|tx| delete_book_in(tx, id))
    }

    /// Deletes a book and, if it was the author's last one, the author too.
    ///
    /// A missing book is a no-op. A constraint failure on the book delete
    /// rolls everything back and is returned. A constraint failure while
    /// removing the orphaned author is logged and dropped; the book stays
    /// deleted.
    pub fn delete_book_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        self.with_transaction(|tx| {
            let Some(book) = delete_book_in(tx, id)? else {
                return Ok(None);
            };

            match remove_author_if_orphaned_in(tx, book.author_id) {
                Ok(true) => tracing::debug!(
                    "Removed author {} with their last book {}",
                    book.author_id,
                    book.id
                ),
                Ok(false) => tracing::debug!("Deleted book {}", book.id),
                Err(DbError::ConstraintViolation(reason)) => tracing::warn!(
                    "Deleted book {} but kept author {}: {}",
                    book.id,
                    book.author_id,
                    reason
                ),
                Err(err) => return Err(err),
            }

            Ok(Some(book))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[test]
    fn add_book_coerces_numeric_fields() {
        let db = setup_db();
        let author = db.add_author("Jane Doe", "1970-01-01", None).unwrap();

        let book = db
            .add_book(NewBook::new("0306406152", "Alpha", " 1999 ", author.id))
            .unwrap();

        assert_eq!(book.publication_year, 1999);
        assert_eq!(book.author_id, author.id);
        assert_eq!(db.get_book_by_id(book.id).unwrap(), Some(book));
    }

    #[test]
    fn add_book_rejects_non_numeric_year() {
        let db = setup_db();
        let author = db.add_author("Jane Doe", "1970-01-01", None).unwrap();

        let err = db
            .add_book(NewBook::new("0306406152", "Alpha", "nineteen", author.id))
            .unwrap_err();

        assert!(matches!(err, DbError::InvalidInput(_)));
        assert!(db.get_all_books().unwrap().is_empty());
    }

    #[test]
    fn get_all_books_orders_by_author_then_title() {
        let db = setup_db();
        let first = db.add_author("Zed", "1970-01-01", None).unwrap();
        let second = db.add_author("Amy", "1970-01-01", None).unwrap();
        db.add_book(NewBook::new("1", "Beta", 2000, second.id)).unwrap();
        db.add_book(NewBook::new("2", "Gamma", 2000, first.id)).unwrap();
        db.add_book(NewBook::new("3", "Alpha", 2000, second.id)).unwrap();

        let titles: Vec<_> = db
            .get_all_books()
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();

        assert_eq!(titles, ["Gamma", "Alpha", "Beta"]);
    }

    #[test]
    fn delete_book_leaves_author_in_place() {
        let db = setup_db();
        let author = db.add_author("Jane Doe", "1970-01-01", None).unwrap();
        let book = db
            .add_book(NewBook::new("0306406152", "Alpha", 2001, author.id))
            .unwrap();

        assert_eq!(db.delete_book(book.id).unwrap(), Some(book.clone()));
        assert!(db.get_author_by_id(author.id).unwrap().is_some());
        assert_eq!(db.delete_book(book.id).unwrap(), None);
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let db = setup_db();
        let author = db.add_author("Jane Doe", "1970-01-01", None).unwrap();
        db.add_book(NewBook::new("1", "100% Cotton", 2000, author.id))
            .unwrap();
        db.add_book(NewBook::new("2", "1000 Cotton Fields", 2000, author.id))
            .unwrap();

        let found = db.get_all_books_with_authors_by_title("0%").unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].book.title, "100% Cotton");
    }
}
