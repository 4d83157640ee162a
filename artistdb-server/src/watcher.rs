//! Input file watcher
//!
//! Watches the directory holding the artist file (editors often replace the
//! file instead of writing in place) and reports debounced changes to it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::{Result, ServerError};
use crate::reload::Reloader;

const DEBOUNCE: Duration = Duration::from_millis(500);

/// Change to the watched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Modified(PathBuf),
    Removed(PathBuf),
}

pub struct FileWatcher {
    /// Kept alive to keep the watch registered
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
    rx: mpsc::UnboundedReceiver<FileEvent>,
}

impl FileWatcher {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path
            .as_ref()
            .canonicalize()
            .map_err(|e| ServerError::Watch(format!("{}: {}", path.as_ref().display(), e)))?;
        let watch_dir = path.parent().unwrap_or(Path::new("/")).to_path_buf();
        let target = path.file_name().map(|n| n.to_os_string());

        let (tx, rx) = mpsc::unbounded_channel();

        let mut debouncer = new_debouncer(DEBOUNCE, move |result: DebounceEventResult| {
            let events = match result {
                Ok(events) => events,
                Err(e) => {
                    warn!("File watch error: {}", e);
                    return;
                }
            };

            for event in events {
                if event.path.file_name() != target.as_deref() {
                    continue;
                }

                let file_event = if event.path.exists() {
                    FileEvent::Modified(event.path)
                } else {
                    FileEvent::Removed(event.path)
                };
                let _ = tx.send(file_event);
            }
        })
        .map_err(|e| ServerError::Watch(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| ServerError::Watch(e.to_string()))?;

        info!("Watching {} for changes", path.display());
        Ok(Self { _debouncer: debouncer, rx })
    }

    pub async fn recv(&mut self) -> Option<FileEvent> {
        self.rx.recv().await
    }

    /// Drop events already queued behind the one being handled
    fn drain(&mut self) -> Option<FileEvent> {
        let mut last = None;
        while let Ok(event) = self.rx.try_recv() {
            last = Some(event);
        }
        last
    }
}

/// Reload on every change until the watcher goes away
///
/// Events that pile up during a pass collapse into one follow-up pass.
pub fn spawn_reload_task(mut watcher: FileWatcher, reloader: Arc<Reloader>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = watcher.recv().await {
            let event = watcher.drain().unwrap_or(event);

            match event {
                FileEvent::Removed(path) => {
                    warn!("{} was removed, keeping current dataset", path.display());
                }
                FileEvent::Modified(path) => {
                    info!("{} changed, reparsing", path.display());
                    if let Err(e) = reloader.reload().await {
                        error!("Reload failed, keeping previous dataset: {}", e);
                    }
                }
            }
        }
        info!("File watcher stopped");
    })
}
