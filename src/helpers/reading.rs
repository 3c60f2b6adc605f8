//! Read time estimation

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
}

/// Default reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Count word-like tokens
///
/// Markup is not stripped, so tag and attribute names count as words.
pub fn count_words(html: &str) -> usize {
    WORD.find_iter(html).count()
}

/// Estimated reading minutes at [`WORDS_PER_MINUTE`], never below 1
pub fn read_time(html: &str) -> usize {
    read_time_at(html, WORDS_PER_MINUTE)
}

/// Estimated reading minutes at a given speed, never below 1
///
/// Halves round to the nearest even minute.
pub fn read_time_at(html: &str, words_per_minute: usize) -> usize {
    let words = count_words(html) as f64;
    let minutes = (words / words_per_minute.max(1) as f64).round_ties_even() as usize;
    minutes.max(1)
}
