//! Content module - source discovery, post metadata and rendering

pub mod loader;
mod markdown;
mod metadata;
mod post;
pub mod render;

pub use loader::SourceFile;
pub use markdown::MarkdownRenderer;
pub use metadata::{
    extract_description, extract_metadata, extract_metadata_with, extract_title,
    DEFAULT_DESCRIPTION, DEFAULT_TITLE,
};
pub use post::{output_filename, slug_for, PostMeta, OUTPUT_EXT, SOURCE_EXT};
pub use render::{CommandRenderer, HtmlRenderer};
