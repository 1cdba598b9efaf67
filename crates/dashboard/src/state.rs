use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::watch;
use vidforge_client::VideoService;
use vidforge_core::error::CoreError;
use vidforge_core::usage::UsageSnapshot;
use vidforge_core::video::{TopicsData, Video, Voice};
use vidforge_events::{Notification, NotificationCenter, Severity};

/// Shared dashboard state.
///
/// Created once and passed around as `Arc<AppState>`. The video list is
/// published through a `watch` channel so the progress tracker can follow
/// it; everything else is read through accessors.
pub struct AppState {
    service: Arc<dyn VideoService>,
    notifications: NotificationCenter,
    videos: watch::Sender<Vec<Video>>,
    topics: RwLock<TopicsData>,
    voices: RwLock<Vec<Voice>>,
    usage: RwLock<UsageSnapshot>,
}

impl AppState {
    pub fn new(service: Arc<dyn VideoService>, notifications: NotificationCenter) -> Self {
        let (videos, _) = watch::channel(Vec::new());
        Self {
            service,
            notifications,
            videos,
            topics: RwLock::new(TopicsData::default()),
            voices: RwLock::new(Vec::new()),
            usage: RwLock::new(UsageSnapshot::default()),
        }
    }

    /// The video-generation service.
    pub fn service(&self) -> &Arc<dyn VideoService> {
        &self.service
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn show_notification(&self, message: impl Into<String>, severity: Severity) -> Notification {
        self.notifications.show(message, severity)
    }

    // ---- video list ----

    /// Every known video, newest first.
    pub fn videos(&self) -> Vec<Video> {
        self.videos.borrow().clone()
    }

    /// Videos still being generated.
    pub fn generating_videos(&self) -> Vec<Video> {
        self.videos
            .borrow()
            .iter()
            .filter(|v| v.is_generating())
            .cloned()
            .collect()
    }

    /// Look up a video by its project name.
    pub fn video(&self, name: &str) -> Result<Video, CoreError> {
        self.videos
            .borrow()
            .iter()
            .find(|v| v.name == name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "Video",
                name: name.to_string(),
            })
    }

    /// Follow changes to the video list.
    pub fn subscribe_videos(&self) -> watch::Receiver<Vec<Video>> {
        self.videos.subscribe()
    }

    /// Replace the video list. Subscribers are only woken when it changed.
    pub fn set_videos(&self, videos: Vec<Video>) {
        self.videos.send_if_modified(|current| {
            if *current == videos {
                false
            } else {
                *current = videos;
                true
            }
        });
    }

    // ---- catalog and usage ----

    pub fn topics(&self) -> TopicsData {
        read(&self.topics).clone()
    }

    pub fn voices(&self) -> Vec<Voice> {
        read(&self.voices).clone()
    }

    pub fn usage(&self) -> UsageSnapshot {
        read(&self.usage).clone()
    }

    // ---- refresh ----
    //
    // Refresh failures are logged and keep the previous value.

    pub async fn refresh_videos(&self) {
        match self.service.videos().await {
            Ok(videos) => {
                tracing::debug!(count = videos.len(), "Video list refreshed");
                self.set_videos(videos);
            }
            Err(e) => tracing::error!(error = %e, "Error fetching videos"),
        }
    }

    pub async fn refresh_topics(&self) {
        match self.service.topics().await {
            Ok(topics) => *write(&self.topics) = topics,
            Err(e) => tracing::error!(error = %e, "Error fetching topics"),
        }
    }

    pub async fn refresh_voices(&self) {
        match self.service.voices().await {
            Ok(voices) => *write(&self.voices) = voices,
            Err(e) => tracing::error!(error = %e, "Error fetching voices"),
        }
    }

    /// Reload all three usage panels. Either all update or none do.
    pub async fn refresh_usage(&self) {
        let result = tokio::try_join!(
            self.service.elevenlabs_usage(),
            self.service.openai_usage(),
            self.service.storage_usage(),
        );
        match result {
            Ok((elevenlabs, openai, storage)) => {
                *write(&self.usage) = UsageSnapshot {
                    elevenlabs: Some(elevenlabs),
                    openai: Some(openai),
                    storage: Some(storage),
                };
            }
            Err(e) => tracing::error!(error = %e, "Error fetching usage"),
        }
    }

    /// Initial load of everything the dashboard shows.
    pub async fn load_all(&self) {
        tokio::join!(
            self.refresh_topics(),
            self.refresh_videos(),
            self.refresh_usage(),
            self.refresh_voices(),
        );
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
