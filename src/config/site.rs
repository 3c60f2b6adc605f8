//! Site configuration (postpress.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
///
/// All paths are relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    pub markdown_dir: String,
    pub posts_dir: String,
    pub template: String,
    pub index: String,

    // Posts
    /// Keep the `YYYY-MM-DD-` filename prefix in slugs and output names
    pub date_in_slug: bool,
    pub link_prefix: String,
    pub words_per_minute: usize,
    pub description_length: usize,

    /// Keep a previously published post in the index when it fails to
    /// render in the current run
    pub keep_failed_posts: bool,

    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            markdown_dir: "posts/markdown".to_string(),
            posts_dir: "posts".to_string(),
            template: "posts/template.html".to_string(),
            index: "posts/index.html".to_string(),

            date_in_slug: false,
            link_prefix: "/posts/".to_string(),
            words_per_minute: 200,
            description_length: 150,

            keep_failed_posts: false,

            renderer: RendererConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}

/// Which markdown renderer to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererBackend {
    /// External command (pandoc by default)
    Pandoc,
    /// In-process pulldown-cmark
    Builtin,
}

/// Markdown renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub backend: RendererBackend,
    pub command: String,
    pub args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backend: RendererBackend::Pandoc,
            command: "pandoc".to_string(),
            args: vec![
                "-f".to_string(),
                "markdown".to_string(),
                "-t".to_string(),
                "html".to_string(),
            ],
        }
    }
}

/// Preview server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 8000,
        }
    }
}
