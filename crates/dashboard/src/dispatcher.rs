use std::sync::Arc;
use std::time::Duration;

use vidforge_client::ApiError;
use vidforge_core::error::CoreError;
use vidforge_core::generation::{
    validate_topic, validate_video_type, GenerateResponse, GenerateVideoRequest,
    GenerationOptions,
};
use vidforge_events::Severity;

use crate::state::AppState;

/// Why a generation request did not start.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The service refused the request or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Validates generation requests and submits them to the service.
pub struct GenerationDispatcher {
    state: Arc<AppState>,
    refresh_delay: Duration,
}

impl GenerationDispatcher {
    pub fn new(state: Arc<AppState>, refresh_delay: Duration) -> Self {
        Self {
            state,
            refresh_delay,
        }
    }

    /// Submit a generation job for `topic`.
    ///
    /// Every outcome is also reported as a notification. On success the
    /// video list is refreshed once after the configured delay so the new
    /// job shows up as generating.
    pub async fn start_generation(
        &self,
        topic: &str,
        options: &GenerationOptions,
    ) -> Result<GenerateResponse, DispatchError> {
        let topic = match validate_topic(topic)
            .and_then(|t| validate_video_type(options.video_type).map(|()| t))
        {
            Ok(topic) => topic,
            Err(e) => {
                self.state.show_notification(e.user_message(), Severity::Error);
                return Err(e.into());
            }
        };

        let request = GenerateVideoRequest::new(topic, options);
        match self.state.service().generate(&request).await {
            Ok(response) => {
                tracing::info!(
                    progress_id = %response.progress_id,
                    video_type = %response.video_type,
                    "Generation started"
                );
                self.state
                    .show_notification(format!("Started generating: \"{topic}\""), Severity::Info);
                self.schedule_refresh();
                Ok(response)
            }
            Err(e) => {
                tracing::error!(error = %e, "Generation request failed");
                self.state
                    .show_notification(format!("Failed to start: {}", e.reason()), Severity::Error);
                Err(e.into())
            }
        }
    }

    fn schedule_refresh(&self) {
        let state = Arc::clone(&self.state);
        let delay = self.refresh_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.refresh_videos().await;
        });
    }
}
