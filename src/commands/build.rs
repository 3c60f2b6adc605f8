//! Build all posts and the index

use anyhow::Result;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use crate::cache::Manifest;
use crate::content::{self, loader, HtmlRenderer, PostMeta};
use crate::error::BuildError;
use crate::generator::{Generator, IndexUpdate};
use crate::watch::ChangeSource;
use crate::Blog;

/// Outcome of one build run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Markdown files found
    pub discovered: usize,
    /// Posts written this run
    pub processed: usize,
    /// Sources skipped after a read or render failure
    pub skipped: Vec<String>,
    /// Skipped posts kept in the index from the manifest
    pub retained: Vec<String>,
    /// Posts whose page is missing the rendered body
    pub incomplete: Vec<String>,
    /// What happened to the index document
    pub index: IndexUpdate,
}

impl BuildSummary {
    fn empty() -> Self {
        Self {
            discovered: 0,
            processed: 0,
            skipped: Vec::new(),
            retained: Vec::new(),
            incomplete: Vec::new(),
            index: IndexUpdate::Skipped,
        }
    }
}

/// Build the site with the renderer selected in its config
pub fn run(blog: &Blog) -> Result<BuildSummary> {
    let renderer = blog.renderer();
    run_with(blog, renderer.as_ref())
}

/// Build the site with a given renderer
pub fn run_with(blog: &Blog, renderer: &dyn HtmlRenderer) -> Result<BuildSummary> {
    run_with_generator(blog, Generator::new(blog, renderer))
}

/// Build the site with a preconfigured generator
pub fn run_with_generator(blog: &Blog, generator: Generator<'_>) -> Result<BuildSummary> {
    let start = std::time::Instant::now();

    if !blog.source_dir.is_dir() {
        return Err(BuildError::SourceDirMissing(blog.source_dir.clone()).into());
    }
    if !blog.template_path.is_file() {
        return Err(BuildError::TemplateMissing(blog.template_path.clone()).into());
    }

    let sources = loader::discover(&blog.source_dir)?;
    let mut summary = BuildSummary::empty();
    summary.discovered = sources.len();

    if sources.is_empty() {
        tracing::info!("No markdown files found in {}", blog.source_dir.display());
        return Ok(summary);
    }

    let keep_failed = blog.config.keep_failed_posts;
    let manifest = if keep_failed {
        Manifest::load(&blog.base_dir)
    } else {
        Manifest::default()
    };

    let mut posts: Vec<PostMeta> = Vec::new();
    let mut seen = HashSet::new();

    for source in &sources {
        match generator.build_post(source)? {
            Some(built) => {
                if !seen.insert(built.meta.slug.clone()) {
                    tracing::warn!(
                        "{} overwrote another post with slug {:?}",
                        source.filename,
                        built.meta.slug
                    );
                }
                if !built.has_content() {
                    summary.incomplete.push(built.meta.slug.clone());
                }
                summary.processed += 1;
                posts.push(built.meta);
            }
            None => {
                summary.skipped.push(source.filename.clone());
                if !keep_failed {
                    continue;
                }
                let slug = content::slug_for(&source.filename, blog.config.date_in_slug);
                if let Some(previous) = manifest.get(&slug) {
                    if blog.posts_dir.join(&previous.output_filename).exists() {
                        tracing::warn!("Keeping previous index entry for {}", slug);
                        summary.retained.push(slug);
                        posts.push(previous.clone());
                    }
                }
            }
        }
    }

    summary.index = generator.regenerate_index(&posts)?;

    if keep_failed {
        Manifest::new(posts).save(&blog.base_dir)?;
    }

    tracing::info!(
        "Converted {} post(s) in {:.2}s",
        summary.processed,
        start.elapsed().as_secs_f64()
    );

    Ok(summary)
}

/// Rebuild whenever a markdown source changes
///
/// Runs until `stop` is set or the change stream ends, then releases the
/// subscription. Each rebuild is a full build; a failed rebuild is logged
/// and watching continues. Returns the number of rebuilds triggered.
pub fn watch<S: ChangeSource>(
    blog: &Blog,
    renderer: &dyn HtmlRenderer,
    source: &mut S,
    stop: &AtomicBool,
) -> Result<usize> {
    let rx = source.subscribe(&blog.source_dir)?;

    tracing::info!(
        "Watching {} for changes. Press Ctrl+C to stop.",
        blog.source_dir.display()
    );

    let mut rebuilds = 0;

    while !stop.load(Ordering::SeqCst) {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                if !event.touches_markdown() {
                    continue;
                }
                for path in event.markdown_paths() {
                    tracing::info!("Detected change: {}", path.display());
                }

                rebuilds += 1;
                match run_with(blog, renderer) {
                    Ok(summary) => {
                        tracing::info!("Rebuilt {} post(s)", summary.processed);
                    }
                    Err(e) => {
                        tracing::error!("Build failed: {:#}", e);
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                // Continue waiting
            }
            Err(RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    source.unsubscribe();
    tracing::info!("Stopped watching");

    Ok(rebuilds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::error::RenderError;
    use crate::watch::ChangeEvent;
    use std::fs;
    use std::path::Path;
    use std::sync::mpsc::{channel, Receiver, Sender};

    const TEMPLATE: &str = "<html>\n<h1>Post Title Goes Here</h1>\n<p class=\"post-meta\">Jan 12, 2026 · 5 min read</p>\n<main class=\"post-content\">\n</main>\n</html>\n";

    const INDEX: &str = "<html>\n    <main>\n      <p>Nothing yet</p>\n\n      <p style=\"margin-top:22px\"><a href=\"/\">Home</a></p>\n    </main>\n</html>\n";

    /// Paragraph per markdown document; "BROKEN" fails
    struct FakeRenderer;

    impl HtmlRenderer for FakeRenderer {
        fn render(&self, markdown: &str) -> Result<String, RenderError> {
            if markdown.contains("BROKEN") {
                return Err(RenderError::Failed("broken".to_string()));
            }
            let body: Vec<_> = markdown.lines().filter(|l| !l.starts_with('#')).collect();
            Ok(format!("<p>{}</p>\n", body.join(" ")))
        }
    }

    fn site(root: &Path, config: SiteConfig) -> Blog {
        fs::create_dir_all(root.join("posts/markdown")).unwrap();
        fs::write(root.join("posts/template.html"), TEMPLATE).unwrap();
        fs::write(root.join("posts/index.html"), INDEX).unwrap();
        Blog::with_config(root, config)
    }

    fn write_post(blog: &Blog, name: &str, body: &str) {
        fs::write(blog.source_dir.join(name), body).unwrap();
    }

    fn index(blog: &Blog) -> String {
        fs::read_to_string(&blog.index_path).unwrap()
    }

    #[test]
    fn test_run_missing_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());
        fs::remove_dir(&blog.source_dir).unwrap();

        let err = run_with(&blog, &FakeRenderer).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::SourceDirMissing(_))
        ));
    }

    #[test]
    fn test_run_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());
        fs::remove_file(&blog.template_path).unwrap();

        let err = run_with(&blog, &FakeRenderer).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::TemplateMissing(_))
        ));
    }

    #[test]
    fn test_run_no_sources_leaves_index() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());

        let summary = run_with(&blog, &FakeRenderer).unwrap();
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.index, IndexUpdate::Skipped);
        assert_eq!(index(&blog), INDEX);
    }

    #[test]
    fn test_run_skips_failed_document() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());
        write_post(&blog, "2026-01-01-good.md", "# Good\nFine.");
        write_post(&blog, "2026-01-02-bad.md", "# Bad\nBROKEN");

        let summary = run_with(&blog, &FakeRenderer).unwrap();
        assert_eq!(summary.discovered, 2);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, vec!["2026-01-02-bad.md"]);

        let html = index(&blog);
        assert!(html.contains("/posts/good.html"));
        assert!(!html.contains("/posts/bad.html"));
        assert!(!html.contains("Nothing yet"));
    }

    #[test]
    fn test_run_orders_index_by_date_then_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());
        write_post(&blog, "2025-06-01-old.md", "# Old\nx");
        write_post(&blog, "2026-01-12-b-same.md", "# B\nx");
        write_post(&blog, "2026-01-12-a-same.md", "# A\nx");
        write_post(&blog, "2026-02-01-new.md", "# New\nx");

        run_with(&blog, &FakeRenderer).unwrap();

        let html = index(&blog);
        let at = |needle: &str| html.find(needle).unwrap();
        assert!(at("/posts/new.html") < at("/posts/a-same.html"));
        assert!(at("/posts/a-same.html") < at("/posts/b-same.html"));
        assert!(at("/posts/b-same.html") < at("/posts/old.html"));
    }

    #[test]
    fn test_run_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());
        write_post(&blog, "2026-01-12-hello.md", "# Hello\nFirst.");
        write_post(&blog, "2026-01-13-again.md", "# Again\nSecond.");

        run_with(&blog, &FakeRenderer).unwrap();
        let first = (
            index(&blog),
            fs::read_to_string(blog.posts_dir.join("hello.html")).unwrap(),
        );
        run_with(&blog, &FakeRenderer).unwrap();
        let second = (
            index(&blog),
            fs::read_to_string(blog.posts_dir.join("hello.html")).unwrap(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_reports_incomplete_pages() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());
        fs::write(&blog.template_path, "<html><h1>Post Title Goes Here</h1></html>").unwrap();
        write_post(&blog, "2026-01-12-hello.md", "# Hello\nFirst.");

        let summary = run_with(&blog, &FakeRenderer).unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.incomplete, vec!["hello"]);
    }

    #[test]
    fn test_failed_post_dropped_from_index_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());
        write_post(&blog, "2026-01-12-hello.md", "# Hello\nFirst.");
        write_post(&blog, "2026-01-13-other.md", "# Other\nSecond.");
        run_with(&blog, &FakeRenderer).unwrap();
        assert!(index(&blog).contains("/posts/hello.html"));

        write_post(&blog, "2026-01-12-hello.md", "# Hello\nBROKEN");
        let summary = run_with(&blog, &FakeRenderer).unwrap();
        assert!(summary.retained.is_empty());
        assert!(!index(&blog).contains("/posts/hello.html"));
        assert!(!dir.path().join(".postpress-cache").exists());
    }

    #[test]
    fn test_failed_post_kept_with_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            keep_failed_posts: true,
            ..SiteConfig::default()
        };
        let blog = site(dir.path(), config);
        write_post(&blog, "2026-01-12-hello.md", "# Hello\nFirst.");
        write_post(&blog, "2026-01-13-other.md", "# Other\nSecond.");
        run_with(&blog, &FakeRenderer).unwrap();
        let before = index(&blog);

        write_post(&blog, "2026-01-12-hello.md", "# Hello\nBROKEN");
        let summary = run_with(&blog, &FakeRenderer).unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.retained, vec!["hello"]);
        assert_eq!(index(&blog), before);

        // Without its page the stale entry is dropped
        fs::remove_file(blog.posts_dir.join("hello.html")).unwrap();
        let summary = run_with(&blog, &FakeRenderer).unwrap();
        assert!(summary.retained.is_empty());
        assert!(!index(&blog).contains("/posts/hello.html"));
    }

    /// Change source fed by the test
    struct ScriptedSource {
        events: Option<Receiver<ChangeEvent>>,
        released: bool,
    }

    impl ScriptedSource {
        fn new() -> (Self, Sender<ChangeEvent>) {
            let (tx, rx) = channel();
            let source = Self {
                events: Some(rx),
                released: false,
            };
            (source, tx)
        }
    }

    impl ChangeSource for ScriptedSource {
        fn subscribe(&mut self, _dir: &Path) -> Result<Receiver<ChangeEvent>> {
            self.events
                .take()
                .ok_or_else(|| anyhow::anyhow!("already subscribed"))
        }

        fn unsubscribe(&mut self) {
            self.released = true;
        }
    }

    #[test]
    fn test_watch_rebuilds_on_markdown_changes() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());
        write_post(&blog, "2026-01-12-hello.md", "# Hello\nFirst.");

        let (mut source, tx) = ScriptedSource::new();
        tx.send(ChangeEvent::new([blog.source_dir.join("notes.txt")]))
            .unwrap();
        tx.send(ChangeEvent::new([blog.source_dir.join("2026-01-12-hello.md")]))
            .unwrap();
        drop(tx);

        let stop = AtomicBool::new(false);
        let rebuilds = watch(&blog, &FakeRenderer, &mut source, &stop).unwrap();

        assert_eq!(rebuilds, 1);
        assert!(source.released);
        assert!(blog.posts_dir.join("hello.html").exists());
    }

    #[test]
    fn test_watch_keeps_going_after_failed_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());
        write_post(&blog, "2026-01-12-hello.md", "# Hello\nFirst.");
        fs::remove_file(&blog.template_path).unwrap();

        let (mut source, tx) = ScriptedSource::new();
        let changed = blog.source_dir.join("2026-01-12-hello.md");
        tx.send(ChangeEvent::new([changed.clone()])).unwrap();
        tx.send(ChangeEvent::new([changed])).unwrap();
        drop(tx);

        let stop = AtomicBool::new(false);
        let rebuilds = watch(&blog, &FakeRenderer, &mut source, &stop).unwrap();
        assert_eq!(rebuilds, 2);
    }

    #[test]
    fn test_watch_stops_on_flag() {
        let dir = tempfile::tempdir().unwrap();
        let blog = site(dir.path(), SiteConfig::default());

        let (mut source, _tx) = ScriptedSource::new();
        let stop = AtomicBool::new(true);
        let rebuilds = watch(&blog, &FakeRenderer, &mut source, &stop).unwrap();
        assert_eq!(rebuilds, 0);
        assert!(source.released);
    }
}
