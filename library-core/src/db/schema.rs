pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (name <> ''),
    birth_date TEXT NOT NULL,
    date_of_death TEXT
);

CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    isbn TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL CHECK (title <> ''),
    publication_year INTEGER NOT NULL,
    author_id INTEGER NOT NULL REFERENCES authors(id),
    UNIQUE (author_id, title)
);

CREATE INDEX IF NOT EXISTS idx_books_author ON books(author_id);
CREATE INDEX IF NOT EXISTS idx_authors_name ON authors(name);

-- A living author has a NULL date_of_death; fold it so the triple stays unique
CREATE UNIQUE INDEX IF NOT EXISTS idx_authors_identity
    ON authors(name, birth_date, COALESCE(date_of_death, ''));
"#;
