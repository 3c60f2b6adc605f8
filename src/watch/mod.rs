//! Directory change notifications
//!
//! Watch mode only needs a blocking stream of "something changed" events
//! for the source directory. [`ChangeSource`] is that stream;
//! [`NotifySource`] provides it from the OS through `notify`.

use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use crate::content::SOURCE_EXT;

/// Paths reported together by one notification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeEvent {
    pub paths: Vec<PathBuf>,
}

impl ChangeEvent {
    /// Create an event for the given paths
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Changed markdown sources in this event
    pub fn markdown_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter().filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(SOURCE_EXT))
                .unwrap_or(false)
        })
    }

    /// Whether any markdown source changed
    pub fn touches_markdown(&self) -> bool {
        self.markdown_paths().next().is_some()
    }
}

/// A subscription to change events for one directory
pub trait ChangeSource {
    /// Start watching `dir`; events arrive on the returned channel
    fn subscribe(&mut self, dir: &Path) -> Result<Receiver<ChangeEvent>>;

    /// Stop watching and release OS resources
    fn unsubscribe(&mut self) {}
}

/// OS file notifications, debounced
pub struct NotifySource {
    debounce: Duration,
    debouncer: Option<Debouncer<RecommendedWatcher>>,
}

impl NotifySource {
    /// Default debounce window
    pub const DEBOUNCE: Duration = Duration::from_millis(500);

    /// Create a source with the default debounce window
    pub fn new() -> Self {
        Self::with_debounce(Self::DEBOUNCE)
    }

    /// Create a source with a custom debounce window
    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            debounce,
            debouncer: None,
        }
    }
}

impl Default for NotifySource {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeSource for NotifySource {
    fn subscribe(&mut self, dir: &Path) -> Result<Receiver<ChangeEvent>> {
        let (tx, rx) = channel();

        let mut debouncer = new_debouncer(self.debounce, move |res: DebounceEventResult| {
            match res {
                Ok(events) => {
                    let event = ChangeEvent::new(events.into_iter().map(|e| e.path));
                    let _ = tx.send(event);
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        })?;

        debouncer.watcher().watch(dir, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", dir);

        // Replacing an earlier debouncer drops its watcher
        self.debouncer = Some(debouncer);
        Ok(rx)
    }

    fn unsubscribe(&mut self) {
        if self.debouncer.take().is_some() {
            tracing::debug!("Watcher released");
        }
    }
}
