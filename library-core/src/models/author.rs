use std::fmt;

use serde::{Deserialize, Serialize};

/// A person who wrote one or more books.
///
/// Dates are kept as `YYYY-MM-DD` text, the same way they are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub birth_date: String,
    pub date_of_death: Option<String>,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.date_of_death {
            None => write!(f, "{}, {}", self.name, self.birth_date),
            Some(died) => write!(f, "{}, {} - {}", self.name, self.birth_date, died),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(date_of_death: Option<&str>) -> Author {
        Author {
            id: 1,
            name: "Jane Doe".into(),
            birth_date: "1970-01-01".into(),
            date_of_death: date_of_death.map(Into::into),
        }
    }

    #[test]
    fn display_living_author_omits_death() {
        assert_eq!(author(None).to_string(), "Jane Doe, 1970-01-01");
    }

    #[test]
    fn display_includes_date_of_death() {
        assert_eq!(
            author(Some("2020-05-06")).to_string(),
            "Jane Doe, 1970-01-01 - 2020-05-06"
        );
    }
}
