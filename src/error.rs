//! Pipeline error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole build run
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("source directory not found: {}", .0.display())]
    SourceDirMissing(PathBuf),

    #[error("template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("index document not found: {}", .0.display())]
    IndexMissing(PathBuf),

    #[error("markdown renderer `{program}` is not available: {source}")]
    RendererUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors reported by an HTML renderer for one document
#[derive(Error, Debug)]
pub enum RenderError {
    /// The renderer could not be started at all
    #[error("renderer `{program}` could not be started: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer ran but rejected this document
    #[error("render failed: {0}")]
    Failed(String),
}

impl RenderError {
    /// Whether this failure must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, RenderError::Unavailable { .. })
    }
}
