//! Date parsing and display for author records.

use chrono::NaiveDate;

/// Format dates are stored and submitted in.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format dates are shown in.
pub const DATE_PRINT_FORMAT: &str = "%m/%d/%Y";

/// Parses a `YYYY-MM-DD` date. Empty or malformed input yields `None`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn display_date(date: NaiveDate) -> String {
    date.format(DATE_PRINT_FORMAT).to_string()
}

pub fn storage_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Reformats a stored date for display, passing unparseable text through.
pub fn display_stored(s: &str) -> String {
    parse_date(s)
        .map(display_date)
        .unwrap_or_else(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2000-12-20"),
            NaiveDate::from_ymd_opt(2000, 12, 20)
        );
        assert_eq!(parse_date(" 1970-01-01 "), NaiveDate::from_ymd_opt(1970, 1, 1));
    }

    #[test]
    fn rejects_empty_and_malformed_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("20/12/2000"), None);
        assert_eq!(parse_date("2000-02-30"), None);
    }

    #[test]
    fn displays_month_day_year() {
        let date = NaiveDate::from_ymd_opt(2000, 12, 20).unwrap();
        assert_eq!(display_date(date), "12/20/2000");
        assert_eq!(storage_date(date), "2000-12-20");
    }

    #[test]
    fn display_stored_passes_through_garbage() {
        assert_eq!(display_stored("1970-01-02"), "01/02/1970");
        assert_eq!(display_stored("unknown"), "unknown");
    }
}
