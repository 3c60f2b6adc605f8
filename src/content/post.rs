//! Post metadata model

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::helpers;

lazy_static! {
    static ref SLUG_DATE: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}-").unwrap();
}

/// Extension of markdown sources
pub const SOURCE_EXT: &str = ".md";

/// Extension of generated post pages
pub const OUTPUT_EXT: &str = ".html";

/// Metadata derived for one post during a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    /// Source filename without the markdown extension (and date prefix)
    pub slug: String,

    /// First top-level heading, or "Untitled"
    pub title: String,

    /// First line of body text, or "Blog post"
    pub description: String,

    /// `YYYY-MM-DD`, from the filename or the build day
    pub date: String,

    /// Display form of `date`
    pub formatted_date: String,

    /// Estimated minutes, at least 1
    pub read_time: usize,

    /// Generated page filename
    pub output_filename: String,
}

impl PostMeta {
    /// Assemble a record, deriving the display date and output filename
    pub fn new(
        slug: String,
        title: String,
        description: String,
        date: String,
        read_time: usize,
    ) -> Self {
        let formatted_date = helpers::format_date(&date);
        let output_filename = output_filename(&slug);
        Self {
            slug,
            title,
            description,
            date,
            formatted_date,
            read_time,
            output_filename,
        }
    }

    /// The "<date> · N min read" line shown on pages and listings
    pub fn meta_line(&self) -> String {
        format!("{} · {} min read", self.formatted_date, self.read_time)
    }
}

/// Slug for a source filename
///
/// The markdown extension is dropped, and so is a leading `YYYY-MM-DD-`
/// unless `keep_date` is set. A name that is only a date keeps it.
///
/// # Examples
/// ```ignore
/// slug_for("2026-01-12-hello.md", false) // -> "hello"
/// slug_for("2026-01-12-hello.md", true)  // -> "2026-01-12-hello"
/// ```
pub fn slug_for(filename: &str, keep_date: bool) -> String {
    let stem = filename.strip_suffix(SOURCE_EXT).unwrap_or(filename);
    if keep_date {
        return stem.to_string();
    }
    match SLUG_DATE.find(stem) {
        Some(m) if m.end() < stem.len() => stem[m.end()..].to_string(),
        _ => stem.to_string(),
    }
}

/// Output filename for a slug
pub fn output_filename(slug: &str) -> String {
    format!("{}{}", slug, OUTPUT_EXT)
}
