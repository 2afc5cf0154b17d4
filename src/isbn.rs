//! ISBN-10 and ISBN-13 checksum validation.
//!
//! Hyphens and spaces are ignored, so `0-306-40615-2` and `0306406152` are
//! the same code.

/// Strips separators and upper-cases a trailing `x` check digit.
pub fn canonical(isbn: &str) -> String {
    isbn.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn is_isbn10(isbn: &str) -> bool {
    let code = canonical(isbn);
    if code.len() != 10 {
        return false;
    }

    let mut sum = 0;
    for (i, c) in code.chars().enumerate() {
        let value = match c {
            'X' if i == 9 => 10,
            _ => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += (10 - i as u32) * value;
    }
    sum % 11 == 0
}

/// ISBN-13 codes must carry the `978` or `979` bookland prefix.
pub fn is_isbn13(isbn: &str) -> bool {
    let code = canonical(isbn);
    if code.len() != 13 || !(code.starts_with("978") || code.starts_with("979")) {
        return false;
    }

    let mut sum = 0;
    for (i, c) in code.chars().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { digit } else { digit * 3 };
    }
    sum % 10 == 0
}

pub fn is_valid(isbn: &str) -> bool {
    is_isbn10(isbn) || is_isbn13(isbn)
}
