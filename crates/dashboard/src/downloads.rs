use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use vidforge_client::{ApiError, AssetKind};
use vidforge_events::Severity;

use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Saves video assets to disk and tracks which downloads are running.
pub struct Downloader {
    state: Arc<AppState>,
    in_flight: Mutex<HashSet<String>>,
}

impl Downloader {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Key under which a download is tracked, e.g. `video-why_cats_purr`.
    pub fn key(kind: AssetKind, name: &str) -> String {
        format!("{}-{name}", kind.as_str())
    }

    pub fn is_downloading(&self, key: &str) -> bool {
        lock(&self.in_flight).contains(key)
    }

    pub async fn download_video(&self, name: &str, dir: &Path) -> Result<PathBuf, DownloadError> {
        self.download(AssetKind::Video, name, dir).await
    }

    pub async fn download_thumbnail(
        &self,
        name: &str,
        dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        self.download(AssetKind::Thumbnail, name, dir).await
    }

    pub async fn download_metadata(
        &self,
        name: &str,
        dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        self.download(AssetKind::Metadata, name, dir).await
    }

    /// Fetch one asset of `name` and write it into `dir`.
    ///
    /// Returns the written path. Failures show a notification naming the
    /// file that could not be saved.
    pub async fn download(
        &self,
        kind: AssetKind,
        name: &str,
        dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let file_name = kind.file_name(name);
        let _guard = InFlight::enter(&self.in_flight, Self::key(kind, name));

        let result = self.fetch_and_write(kind, name, &dir.join(&file_name)).await;
        match &result {
            Ok(path) => tracing::info!(path = %path.display(), "Download saved"),
            Err(e) => {
                tracing::error!(file = %file_name, error = %e, "Download failed");
                self.state
                    .show_notification(format!("Failed to download {file_name}"), Severity::Error);
            }
        }
        result
    }

    async fn fetch_and_write(
        &self,
        kind: AssetKind,
        name: &str,
        path: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let bytes = self.state.service().download(kind, name).await?;
        tokio::fs::write(path, &bytes)
            .await
            .map_err(|source| DownloadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(path.to_path_buf())
    }
}

/// Marks a key as in flight until dropped.
struct InFlight<'a> {
    set: &'a Mutex<HashSet<String>>,
    key: String,
}

impl<'a> InFlight<'a> {
    fn enter(set: &'a Mutex<HashSet<String>>, key: String) -> Self {
        lock(set).insert(key.clone());
        Self { set, key }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.key);
    }
}

fn lock(set: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
