//! Date helper functions

use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_PREFIX: Regex = Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2})").unwrap();
}

/// Format used for post dates and filename prefixes
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Take the `YYYY-MM-DD` prefix of a filename, or today's date
///
/// # Examples
/// ```ignore
/// derive_date("2026-01-12-hello.md") // -> "2026-01-12"
/// ```
pub fn derive_date(filename: &str) -> String {
    derive_date_on(filename, Local::now().date_naive())
}

/// Same as [`derive_date`] with an explicit fallback day
pub fn derive_date_on(filename: &str, today: NaiveDate) -> String {
    match DATE_PREFIX.captures(filename) {
        Some(caps) => caps[1].to_string(),
        None => today.format(DATE_FORMAT).to_string(),
    }
}

/// Render `YYYY-MM-DD` as "Jan 12, 2026"
///
/// Anything that does not parse is returned unchanged.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(d) => d.format("%b %d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}
