//! Page templating
//!
//! Post pages and the index listing are produced by filling an
//! externally authored HTML document. [`TemplateBackend`] is the seam
//! between the build pipeline and the filling strategy; the only backend
//! shipped is [`LiteralTemplates`], which works by exact find-and-replace
//! against fixed placeholder strings.

mod literal;

use std::fmt;

use crate::content::PostMeta;

pub use literal::{
    LiteralTemplates, CONTENT_OPEN, INDEX_REGION, META_PLACEHOLDER, TITLE_PLACEHOLDER,
};

/// A placeholder a backend looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Post title heading
    Title,
    /// Post date and read time line
    MetaLine,
    /// Opening tag of the post body container
    Content,
    /// Listing region of the index document
    Listing,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Marker::Title => "title heading",
            Marker::MetaLine => "meta line",
            Marker::Content => "content container",
            Marker::Listing => "listing region",
        };
        f.write_str(name)
    }
}

/// Result of filling a document
///
/// A marker that was not found leaves that part of the document as it
/// was; it is reported here rather than raised as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub html: String,
    pub missing: Vec<Marker>,
}

impl Substitution {
    /// Whether every marker was found
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Whether a given marker was found
    pub fn found(&self, marker: Marker) -> bool {
        !self.missing.contains(&marker)
    }
}

/// Strategy for producing post pages and the index listing
pub trait TemplateBackend: Send + Sync {
    /// Fill the post template with one post's metadata and body fragment
    fn fill_post(&self, template: &str, meta: &PostMeta, fragment: &str) -> Substitution;

    /// Render the listing markup for posts already in display order
    fn render_listing(&self, posts: &[PostMeta], link_prefix: &str) -> String;

    /// Replace the listing region of the index document
    fn fill_index(&self, index: &str, listing: &str) -> Substitution;
}
