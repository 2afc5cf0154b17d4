use std::fmt;

use serde::{Deserialize, Serialize};

use super::Author;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub publication_year: i64,
    pub author_id: i64,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.title, self.isbn, self.publication_year, self.author_id
        )
    }
}

/// Book fields as submitted by a form.
///
/// `publication_year` and `author_id` are still text here; they are coerced
/// to integers when the book is inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub publication_year: String,
    pub author_id: String,
}

impl NewBook {
    pub fn new(
        isbn: &str,
        title: &str,
        publication_year: impl ToString,
        author_id: impl ToString,
    ) -> Self {
        Self {
            isbn: isbn.to_string(),
            title: title.to_string(),
            publication_year: publication_year.to_string(),
            author_id: author_id.to_string(),
        }
    }
}

/// A book joined with the author it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookWithAuthor {
    pub book: Book,
    pub author: Author,
}

/// Sort keys accepted by the joined book listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookSort {
    Title,
    AuthorName,
    PublicationYear,
}

impl BookSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::AuthorName => "author",
            Self::PublicationYear => "year",
        }
    }

    /// Parses the `sort_by` query value used by the listing page.
    pub fn from_query(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "author" => Some(Self::AuthorName),
            "year" => Some(Self::PublicationYear),
            _ => None,
        }
    }

    pub(crate) fn order_by_clause(&self) -> &'static str {
        match self {
            Self::Title => "b.title, b.id",
            Self::AuthorName => "a.name, b.id",
            Self::PublicationYear => "b.publication_year, b.id",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_parse_from_query() {
        for sort in [BookSort::Title, BookSort::AuthorName, BookSort::PublicationYear] {
            assert_eq!(BookSort::from_query(sort.as_str()), Some(sort));
        }
        assert_eq!(BookSort::from_query("isbn"), None);
        assert_eq!(BookSort::from_query(""), None);
    }

    #[test]
    fn display_lists_book_fields() {
        let book = Book {
            id: 3,
            isbn: "0306406152".into(),
            title: "Alpha".into(),
            publication_year: 1999,
            author_id: 7,
        };
        assert_eq!(book.to_string(), "Alpha 0306406152 1999 7");
    }
}
