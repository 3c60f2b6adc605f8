//! Index listing regeneration

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;

use super::Generator;
use crate::content::PostMeta;
use crate::error::BuildError;
use crate::templates::Marker;

/// What happened to the index document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexUpdate {
    /// No posts, the index was not touched
    Skipped,
    /// The index was rewritten
    Written {
        /// Number of listing entries
        entries: usize,
        /// False when the listing region was not found and the
        /// document was written back unchanged
        region_found: bool,
    },
}

/// Order posts newest first
///
/// `YYYY-MM-DD` strings sort chronologically. The sort is stable, so posts
/// sharing a date keep their discovery order.
pub fn sort_newest_first(posts: &[PostMeta]) -> Vec<PostMeta> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

impl Generator<'_> {
    /// Rewrite the listing region of the index document from `posts`
    pub fn regenerate_index(&self, posts: &[PostMeta]) -> Result<IndexUpdate> {
        if posts.is_empty() {
            return Ok(IndexUpdate::Skipped);
        }

        let sorted = sort_newest_first(posts);
        let listing = self
            .templates
            .render_listing(&sorted, &self.blog.config.link_prefix);

        let index_path = &self.blog.index_path;
        let index = match fs::read_to_string(index_path) {
            Ok(index) => index,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BuildError::IndexMissing(index_path.clone()).into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", index_path.display()))
            }
        };

        let updated = self.templates.fill_index(&index, &listing);
        let region_found = updated.found(Marker::Listing);
        if !region_found {
            tracing::warn!(
                "No listing region found in {}; index left as is",
                index_path.display()
            );
        }

        fs::write(index_path, &updated.html)
            .with_context(|| format!("failed to write {}", index_path.display()))?;

        tracing::info!(
            "Updated {} with {} post(s)",
            index_path.display(),
            sorted.len()
        );

        Ok(IndexUpdate::Written {
            entries: sorted.len(),
            region_found,
        })
    }
}
