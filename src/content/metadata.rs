//! Title and description extraction from raw markdown

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TITLE: Regex = Regex::new(r"(?m)^# (.+?)\r?$").unwrap();
}

/// Title used when a document has no top-level heading
pub const DEFAULT_TITLE: &str = "Untitled";

/// Description used when a document has no body text
pub const DEFAULT_DESCRIPTION: &str = "Blog post";

/// Default description length in characters
pub const DESCRIPTION_LENGTH: usize = 150;

/// Extract `(title, description)` from markdown
pub fn extract_metadata(markdown: &str) -> (String, String) {
    extract_metadata_with(markdown, DESCRIPTION_LENGTH)
}

/// Extract `(title, description)`, cutting the description at `max_chars`
pub fn extract_metadata_with(markdown: &str, max_chars: usize) -> (String, String) {
    (
        extract_title(markdown),
        extract_description(markdown, max_chars),
    )
}

/// First `# ` heading line, without the marker
pub fn extract_title(markdown: &str) -> String {
    TITLE
        .captures(markdown)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// First line that does not start with `#`, cut to `max_chars` and trimmed
///
/// A blank line counts, so a heading followed by an empty line gives an
/// empty description. Only a document made entirely of heading lines with
/// no trailing newline falls back to [`DEFAULT_DESCRIPTION`].
pub fn extract_description(markdown: &str, max_chars: usize) -> String {
    markdown
        .split('\n')
        .find(|line| !line.starts_with('#'))
        .map(|line| {
            let cut: String = line.chars().take(max_chars).collect();
            cut.trim().to_string()
        })
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string())
}
