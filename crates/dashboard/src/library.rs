use std::sync::Arc;

use vidforge_client::ApiError;
use vidforge_core::catalog::VideoType;
use vidforge_core::video::VideoMetadata;
use vidforge_events::Severity;

use crate::state::AppState;

/// Operations on finished videos and voice samples.
pub struct VideoLibrary {
    state: Arc<AppState>,
}

impl VideoLibrary {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Delete a video, then reload everything that depends on the library.
    pub async fn delete_video(&self, name: &str) -> Result<(), ApiError> {
        match self.state.service().delete_video(name).await {
            Ok(message) => {
                tracing::info!(video = %name, %message, "Video deleted");
                self.state
                    .show_notification("Video deleted successfully!", Severity::Success);
                tokio::join!(
                    self.state.refresh_videos(),
                    self.state.refresh_topics(),
                    self.state.refresh_usage(),
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(video = %name, error = %e, "Error deleting video");
                self.state
                    .show_notification("Failed to delete video", Severity::Error);
                Err(e)
            }
        }
    }

    pub async fn load_metadata(&self, name: &str) -> Result<VideoMetadata, ApiError> {
        self.state.service().metadata(name).await.inspect_err(|e| {
            tracing::error!(video = %name, error = %e, "Error loading metadata");
            self.state
                .show_notification("Failed to load metadata", Severity::Error);
        })
    }

    /// Fetch a short spoken sample of `voice_id` as raw audio bytes.
    pub async fn test_voice(
        &self,
        voice_id: &str,
        video_type: VideoType,
    ) -> Result<Vec<u8>, ApiError> {
        match self.state.service().test_voice(voice_id, video_type).await {
            Ok(audio) => {
                tracing::debug!(voice_id, bytes = audio.len(), "Voice sample received");
                self.state.show_notification("Voice test ready", Severity::Success);
                Ok(audio)
            }
            Err(e) => {
                tracing::error!(voice_id, error = %e, "Error testing voice");
                self.state.show_notification("Failed to test voice", Severity::Error);
                Err(e)
            }
        }
    }
}
