//! Post manifest persisted between builds
//!
//! The manifest remembers the metadata of every post listed in the index
//! by the last build. It lets a post that fails to render keep its index
//! entry instead of disappearing until the next successful build.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::PostMeta;

/// Cache directory under the site root
const CACHE_DIR: &str = ".postpress-cache";

/// Manifest file name
const MANIFEST_FILE: &str = ".postpress-cache/manifest.json";

/// Metadata of the posts listed by the last build
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    /// Version of the manifest format
    pub version: u32,
    /// Posts in discovery order
    pub posts: Vec<PostMeta>,
}

impl Manifest {
    /// Current manifest format version
    const VERSION: u32 = 1;

    /// Create a manifest holding `posts`
    pub fn new(posts: Vec<PostMeta>) -> Self {
        Self {
            version: Self::VERSION,
            posts,
        }
    }

    /// Load the manifest from disk, or an empty one
    pub fn load(base_dir: &Path) -> Self {
        let manifest_path = base_dir.join(MANIFEST_FILE);
        if let Ok(content) = fs::read_to_string(&manifest_path) {
            match serde_json::from_str::<Manifest>(&content) {
                Ok(manifest) if manifest.version == Self::VERSION => return manifest,
                Ok(_) => tracing::info!("Manifest version mismatch, starting fresh"),
                Err(e) => tracing::warn!("Ignoring unreadable manifest: {}", e),
            }
        }
        Self::default()
    }

    /// Save the manifest to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        fs::create_dir_all(base_dir.join(CACHE_DIR))?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(base_dir.join(MANIFEST_FILE), content)?;
        Ok(())
    }

    /// Previously recorded metadata for a slug
    pub fn get(&self, slug: &str) -> Option<&PostMeta> {
        self.posts.iter().find(|p| p.slug == slug)
    }
}
