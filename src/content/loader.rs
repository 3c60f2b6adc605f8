//! Source discovery - finds markdown posts in the source directory

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::post::SOURCE_EXT;

/// A markdown file found in the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name only, e.g. `2026-01-12-hello.md`
    pub filename: String,
}

/// List the `*.md` files directly inside `dir`, sorted by filename
///
/// The order is the discovery order used to break date ties in the index.
pub fn discover(dir: &Path) -> Result<Vec<SourceFile>> {
    let pattern = format!(
        "{}/*{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        SOURCE_EXT
    );

    let mut sources = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("bad source pattern {}", pattern))? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!("Skipping non UTF-8 filename {:?}", path);
            continue;
        };
        sources.push(SourceFile {
            filename: filename.to_string(),
            path,
        });
    }

    sources.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_sorted_markdown_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2026-02-01-b.md"), "b").unwrap();
        fs::write(dir.path().join("2026-01-01-a.md"), "a").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("draft.markdown"), "x").unwrap();
        fs::create_dir(dir.path().join("nested.md")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("2026-03-01-c.md"), "c").unwrap();

        let found = discover(dir.path()).unwrap();
        let names: Vec<_> = found.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(names, vec!["2026-01-01-a.md", "2026-02-01-b.md"]);
        assert_eq!(found[0].path, dir.path().join("2026-01-01-a.md"));
    }

    #[test]
    fn test_discover_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_discover_escapes_dir_name() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("posts [draft]");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.md"), "a").unwrap();
        assert_eq!(discover(&dir).unwrap().len(), 1);
    }
}
