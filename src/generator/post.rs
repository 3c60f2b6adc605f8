//! Post page generation

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::Generator;
use crate::content::{self, PostMeta, SourceFile};
use crate::error::{BuildError, RenderError};
use crate::helpers;
use crate::templates::Marker;

/// A post page written during a build
#[derive(Debug, Clone)]
pub struct BuiltPost {
    pub meta: PostMeta,
    /// Where the page was written
    pub output: PathBuf,
    /// Template placeholders that were not found
    pub missing: Vec<Marker>,
}

impl BuiltPost {
    /// Whether the rendered body made it into the page
    pub fn has_content(&self) -> bool {
        !self.missing.contains(&Marker::Content)
    }
}

impl Generator<'_> {
    /// Build the page for one markdown source
    ///
    /// Returns `Ok(None)` when this document is skipped: it could not be
    /// read or the renderer rejected it. An unavailable renderer is an error
    /// for the whole run.
    pub fn build_post(&self, source: &SourceFile) -> Result<Option<BuiltPost>> {
        let config = &self.blog.config;
        let slug = content::slug_for(&source.filename, config.date_in_slug);

        tracing::info!("Converting {}...", source.filename);

        let markdown = match fs::read_to_string(&source.path) {
            Ok(markdown) => markdown,
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", source.path, e);
                return Ok(None);
            }
        };

        let (title, description) =
            content::extract_metadata_with(&markdown, config.description_length);
        let date = helpers::derive_date_on(&source.filename, self.today);

        let fragment = match self.renderer.render(&markdown) {
            Ok(fragment) => fragment,
            Err(RenderError::Unavailable { program, source: err }) => {
                return Err(BuildError::RendererUnavailable {
                    program,
                    source: err,
                }
                .into());
            }
            Err(e) => {
                tracing::warn!("Error converting {}: {}", source.filename, e);
                return Ok(None);
            }
        };

        let read_time = helpers::read_time_at(&fragment, config.words_per_minute);
        let meta = PostMeta::new(slug, title, description, date, read_time);

        // Read on every post so template edits show up without a restart
        let template = fs::read_to_string(&self.blog.template_path).with_context(|| {
            format!("failed to read template {}", self.blog.template_path.display())
        })?;

        let page = self.templates.fill_post(&template, &meta, &fragment);
        for marker in &page.missing {
            tracing::warn!(
                "Template {} has no {} placeholder; {} is missing it",
                self.blog.template_path.display(),
                marker,
                meta.output_filename
            );
        }

        let output = self.blog.posts_dir.join(&meta.output_filename);
        fs::create_dir_all(&self.blog.posts_dir).with_context(|| {
            format!("failed to create {}", self.blog.posts_dir.display())
        })?;
        fs::write(&output, &page.html)
            .with_context(|| format!("failed to write {}", output.display()))?;

        tracing::info!("  Created {}", meta.output_filename);

        Ok(Some(BuiltPost {
            meta,
            output,
            missing: page.missing,
        }))
    }
}
