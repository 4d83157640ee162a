//! Serialized parse passes
//!
//! The [`Reloader`] owns the only [`DatasetBuilder`] of the process behind an
//! async mutex. Triggers arriving while a pass runs wait for it to finish, so
//! two passes never share the parse context.

use artistdb_common::{DatasetBuilder, DatasetSink, SocialRegistry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Outcome of the last successful pass
#[derive(Debug, Clone, Serialize)]
pub struct ReloadStatus {
    pub artists: usize,
    pub finished_at: DateTime<Utc>,
}

pub struct Reloader {
    builder: Mutex<DatasetBuilder<'static>>,
    input_file: PathBuf,
    sink: Arc<dyn DatasetSink>,
    last: RwLock<Option<ReloadStatus>>,
}

impl Reloader {
    pub fn new(input_file: impl Into<PathBuf>, sink: Arc<dyn DatasetSink>) -> Self {
        Self {
            builder: Mutex::new(DatasetBuilder::new(SocialRegistry::builtin())),
            input_file: input_file.into(),
            sink,
            last: RwLock::new(None),
        }
    }

    pub fn input_file(&self) -> &Path {
        &self.input_file
    }

    /// Read the input file and run one pass against the sink
    ///
    /// On error the sink keeps its previous dataset and the last status is
    /// left untouched.
    pub async fn reload(&self) -> artistdb_common::Result<usize> {
        let mut builder = self.builder.lock().await;
        debug!("Reloading {}", self.input_file.display());

        let raw = tokio::fs::read_to_string(&self.input_file).await?;
        let count = builder.run(&raw, self.sink.as_ref()).await?;

        *self.last.write().await = Some(ReloadStatus { artists: count, finished_at: Utc::now() });
        info!("Reloaded {} artists from {}", count, self.input_file.display());

        Ok(count)
    }

    pub async fn last_status(&self) -> Option<ReloadStatus> {
        self.last.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artistdb_common::db::{init_memory_database, ArtistStore};
    use tempfile::TempDir;

    async fn setup(content: &str) -> (TempDir, ArtistStore, Arc<Reloader>) {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("artists.txt");
        std::fs::write(&input, content).unwrap();

        let store = ArtistStore::new(init_memory_database().await.unwrap());
        let reloader = Arc::new(Reloader::new(&input, Arc::new(store.clone())));
        (tmp, store, reloader)
    }

    #[tokio::test]
    async fn test_reload_records_status() {
        let (_tmp, store, reloader) = setup("alice,,_\nalice@github").await;
        assert!(reloader.last_status().await.is_none());

        assert_eq!(reloader.reload().await.unwrap(), 1);

        let status = reloader.last_status().await.unwrap();
        assert_eq!(status.artists, 1);
        assert_eq!(store.count_artists().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_data() {
        let (tmp, store, reloader) = setup("alice,,_\nalice@github").await;
        reloader.reload().await.unwrap();
        let before = reloader.last_status().await.unwrap();

        // No avatar-eligible social to infer from
        std::fs::write(tmp.path().join("artists.txt"), "bob,,_\n//bob.example,Site").unwrap();
        assert!(reloader.reload().await.is_err());

        assert_eq!(reloader.last_status().await.unwrap().finished_at, before.finished_at);
        assert!(store.find_artist("alice").await.unwrap().is_some());
        assert!(store.find_artist("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_input_file() {
        let (tmp, _store, reloader) = setup("").await;
        std::fs::remove_file(tmp.path().join("artists.txt")).unwrap();

        assert!(matches!(reloader.reload().await, Err(artistdb_common::Error::Io(_))));
    }

    #[tokio::test]
    async fn test_concurrent_reloads_are_serialized() {
        let (_tmp, store, reloader) =
            setup("alice,,_,ally\nalice@github\n\nbob,,_,bobby\nbob@github").await;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reloader = Arc::clone(&reloader);
                tokio::spawn(async move { reloader.reload().await })
            })
            .collect();

        // A shared parse context would report the second pass's usernames as duplicates
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 2);
        }
        assert_eq!(store.count_artists().await.unwrap(), 2);
    }
}
