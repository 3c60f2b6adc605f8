//! postpress: builds a blog from a directory of markdown posts
//!
//! Each `posts/markdown/*.md` source becomes a standalone page made from a
//! shared HTML template, and the listing section of `posts/index.html` is
//! regenerated with every post, newest first.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;
pub mod watch;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use commands::build::BuildSummary;
pub use error::{BuildError, RenderError};

/// Optional config file at the site root
pub const CONFIG_FILE: &str = "postpress.yml";

/// A blog site rooted at a directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Site root
    pub base_dir: PathBuf,
    /// Markdown sources
    pub source_dir: PathBuf,
    /// Generated post pages
    pub posts_dir: PathBuf,
    /// Post page template
    pub template_path: PathBuf,
    /// Index document holding the listing
    pub index_path: PathBuf,
}

impl Blog {
    /// Open a site, reading `postpress.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            source_dir: base_dir.join(&config.markdown_dir),
            posts_dir: base_dir.join(&config.posts_dir),
            template_path: base_dir.join(&config.template),
            index_path: base_dir.join(&config.index),
            config,
            base_dir,
        }
    }

    /// The markdown renderer selected in the config
    pub fn renderer(&self) -> Box<dyn content::HtmlRenderer> {
        content::render::from_config(&self.config.renderer)
    }

    /// Build every post and regenerate the index
    pub fn build(&self) -> Result<BuildSummary> {
        commands::build::run(self)
    }
}
