//! Shared fixtures for dashboard integration tests.
//!
//! [`ScriptedService`] stands in for the HTTP client: progress answers are
//! scripted per token, any endpoint can be told to fail, and every call is
//! counted.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;

use vidforge_client::{ApiError, AssetKind, VideoService};
use vidforge_core::catalog::VideoType;
use vidforge_core::generation::{GenerateResponse, GenerateVideoRequest};
use vidforge_core::progress::{GenerationProgress, ProgressStatus};
use vidforge_core::usage::{ElevenLabsUsage, OpenAiUsage, StorageUsage};
use vidforge_core::video::{TopicsData, Video, VideoMetadata, VideoStatus, Voice};
use vidforge_dashboard::AppState;
use vidforge_events::{Notification, NotificationCenter};

/// One scripted answer of the progress endpoint.
#[derive(Debug, Clone)]
pub enum Step {
    Ok(GenerationProgress),
    Fail,
    /// Answer after a delay on the (paused) clock.
    Slow(Duration, GenerationProgress),
}

#[derive(Default)]
pub struct ScriptedService {
    progress: Mutex<HashMap<String, VecDeque<Step>>>,
    videos: Mutex<Vec<Video>>,
    failing: Mutex<HashSet<&'static str>>,
    failure_body: Mutex<String>,
    last_request: Mutex<Option<GenerateVideoRequest>>,
    progress_calls: AtomicUsize,
    video_calls: AtomicUsize,
    generate_calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script the answers for `token`. The last step repeats forever.
    pub fn script(&self, token: &str, steps: impl IntoIterator<Item = Step>) {
        self.progress
            .lock()
            .unwrap()
            .insert(token.to_string(), steps.into_iter().collect());
    }

    pub fn set_videos(&self, videos: Vec<Video>) {
        *self.videos.lock().unwrap() = videos;
    }

    /// Make `endpoint` answer with HTTP 500 and `body`.
    pub fn fail(&self, endpoint: &'static str, body: &str) {
        self.failing.lock().unwrap().insert(endpoint);
        *self.failure_body.lock().unwrap() = body.to_string();
    }

    pub fn progress_calls(&self) -> usize {
        self.progress_calls.load(Ordering::SeqCst)
    }

    pub fn video_calls(&self) -> usize {
        self.video_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerateVideoRequest> {
        self.last_request.lock().unwrap().clone()
    }

    fn check(&self, endpoint: &'static str) -> Result<(), ApiError> {
        if self.failing.lock().unwrap().contains(endpoint) {
            Err(ApiError::Status {
                status: 500,
                body: self.failure_body.lock().unwrap().clone(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl VideoService for ScriptedService {
    async fn topics(&self) -> Result<TopicsData, ApiError> {
        self.check("topics")?;
        Ok(TopicsData::default())
    }

    async fn voices(&self) -> Result<Vec<Voice>, ApiError> {
        self.check("voices")?;
        Ok(Vec::new())
    }

    async fn test_voice(
        &self,
        _voice_id: &str,
        _video_type: VideoType,
    ) -> Result<Vec<u8>, ApiError> {
        self.check("test_voice")?;
        Ok(b"ID3".to_vec())
    }

    async fn generate(
        &self,
        request: &GenerateVideoRequest,
    ) -> Result<GenerateResponse, ApiError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.check("generate")?;
        Ok(GenerateResponse {
            progress_id: "f00dcafe".to_string(),
            video_type: request.video_type,
        })
    }

    async fn progress(&self, progress_id: &str) -> Result<GenerationProgress, ApiError> {
        self.progress_calls.fetch_add(1, Ordering::SeqCst);
        let step = {
            let mut scripts = self.progress.lock().unwrap();
            match scripts.get_mut(progress_id) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        match step {
            Some(Step::Ok(progress)) => Ok(progress),
            Some(Step::Slow(delay, progress)) => {
                tokio::time::sleep(delay).await;
                Ok(progress)
            }
            Some(Step::Fail) => Err(ApiError::Status {
                status: 502,
                body: "Bad Gateway".to_string(),
            }),
            // Unknown tokens read as the service's placeholder.
            None => Ok(lost()),
        }
    }

    async fn videos(&self) -> Result<Vec<Video>, ApiError> {
        self.video_calls.fetch_add(1, Ordering::SeqCst);
        self.check("videos")?;
        Ok(self.videos.lock().unwrap().clone())
    }

    async fn delete_video(&self, name: &str) -> Result<String, ApiError> {
        self.check("delete")?;
        self.videos.lock().unwrap().retain(|v| v.name != name);
        Ok(format!("Video {name} deleted"))
    }

    async fn metadata(&self, name: &str) -> Result<VideoMetadata, ApiError> {
        self.check("metadata")?;
        Ok(VideoMetadata {
            title: name.replace('_', " "),
            description: "A short explainer.".to_string(),
            tags: vec!["science".to_string()],
            timestamps: None,
            video_type: VideoType::Standard,
            original_topic: None,
        })
    }

    async fn elevenlabs_usage(&self) -> Result<ElevenLabsUsage, ApiError> {
        self.check("elevenlabs")?;
        Ok(ElevenLabsUsage {
            character_count: 2_500,
            character_limit: 10_000,
            tier: "starter".to_string(),
            status: "active".to_string(),
        })
    }

    async fn openai_usage(&self) -> Result<OpenAiUsage, ApiError> {
        self.check("openai")?;
        Ok(OpenAiUsage::default())
    }

    async fn storage_usage(&self) -> Result<StorageUsage, ApiError> {
        self.check("storage")?;
        Ok(StorageUsage::default())
    }

    async fn download(&self, kind: AssetKind, name: &str) -> Result<Vec<u8>, ApiError> {
        self.check("download")?;
        Ok(format!("{kind}:{name}").into_bytes())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Shared state over `service` with the default notification lifetime.
pub fn state_with(service: &Arc<ScriptedService>) -> Arc<AppState> {
    let service: Arc<dyn VideoService> = service.clone();
    Arc::new(AppState::new(service, NotificationCenter::default()))
}

pub fn processing(pct: u8) -> GenerationProgress {
    GenerationProgress::new("Generating script with AI", pct, ProgressStatus::Processing)
}

/// The placeholder the service returns for tokens it no longer knows.
pub fn lost() -> GenerationProgress {
    GenerationProgress::new("Waiting", 0, ProgressStatus::Waiting)
}

pub fn done() -> GenerationProgress {
    GenerationProgress::new("Complete!", 100, ProgressStatus::Completed)
}

pub fn failed() -> GenerationProgress {
    GenerationProgress::new("Error", 35, ProgressStatus::Error).with_details("Voiceover failed")
}

pub fn video(name: &str, status: VideoStatus, progress_id: Option<&str>) -> Video {
    Video {
        name: name.to_string(),
        display_name: name.replace('_', " "),
        video: None,
        thumbnail: None,
        size_mb: 0.0,
        duration: None,
        duration_formatted: None,
        created: 1_700_000_000,
        status,
        has_metadata: false,
        progress_id: progress_id.map(str::to_string),
        video_type: Some(VideoType::Standard),
    }
}

/// Everything currently queued on a notification feed.
pub fn drain(feed: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = feed.try_recv() {
        out.push(notification);
    }
    out
}
