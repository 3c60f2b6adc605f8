//! Find-and-replace templating against fixed placeholder strings

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::{Marker, Substitution, TemplateBackend};
use crate::content::PostMeta;

/// Title heading placeholder in the post template
pub const TITLE_PLACEHOLDER: &str = "<h1>Post Title Goes Here</h1>";

/// Date and read time placeholder in the post template
pub const META_PLACEHOLDER: &str = r#"<p class="post-meta">Jan 12, 2026 · 5 min read</p>"#;

/// Opening tag of the post body container, newline included
pub const CONTENT_OPEN: &str = "<main class=\"post-content\">\n";

/// Index listing region: from `<main>` to the first trailing paragraph after it
pub const INDEX_REGION: &str = r#"(?s)(<main>\s*).*?(<p style="margin-top:22px">)"#;

lazy_static! {
    static ref LISTING_REGION: Regex = Regex::new(INDEX_REGION).unwrap();
}

/// Templating by exact substring replacement
///
/// Values are inserted verbatim, without HTML escaping.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralTemplates;

impl LiteralTemplates {
    /// Markup for one index entry
    pub fn listing_entry(meta: &PostMeta, link_prefix: &str) -> String {
        format!(
            r#"      <article class="post">
        <h2><a href="{prefix}{file}">{title}</a></h2>
        <p class="meta">{meta_line}</p>
        <p>{description}</p>
      </article>"#,
            prefix = link_prefix,
            file = meta.output_filename,
            title = meta.title,
            meta_line = meta.meta_line(),
            description = meta.description,
        )
    }
}

impl TemplateBackend for LiteralTemplates {
    fn fill_post(&self, template: &str, meta: &PostMeta, fragment: &str) -> Substitution {
        let title = format!("<h1>{}</h1>", meta.title);
        let meta_line = format!(r#"<p class="post-meta">{}</p>"#, meta.meta_line());
        let content = format!("{}{}", CONTENT_OPEN, fragment);

        let mut html = template.to_string();
        let mut missing = Vec::new();
        for (marker, placeholder, value) in [
            (Marker::Title, TITLE_PLACEHOLDER, title.as_str()),
            (Marker::MetaLine, META_PLACEHOLDER, meta_line.as_str()),
            (Marker::Content, CONTENT_OPEN, content.as_str()),
        ] {
            if html.contains(placeholder) {
                html = html.replace(placeholder, value);
            } else {
                missing.push(marker);
            }
        }

        Substitution { html, missing }
    }

    fn render_listing(&self, posts: &[PostMeta], link_prefix: &str) -> String {
        posts
            .iter()
            .map(|meta| Self::listing_entry(meta, link_prefix))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn fill_index(&self, index: &str, listing: &str) -> Substitution {
        if !LISTING_REGION.is_match(index) {
            return Substitution {
                html: index.to_string(),
                missing: vec![Marker::Listing],
            };
        }

        // The whitespace after `<main>` is kept as the first entry's indent,
        // so the listing's own leading indent is dropped to keep reruns stable.
        let html = LISTING_REGION
            .replace(index, |caps: &Captures| {
                format!("{}{}\n\n      {}", &caps[1], listing.trim_start(), &caps[2])
            })
            .into_owned();

        Substitution {
            html,
            missing: Vec::new(),
        }
    }
}
