//! HTTP client for the video-generation REST endpoints.
//!
//! Wraps the service API (topics, voices, generation, progress, the
//! video library, usage, and asset downloads) using [`reqwest`]. All
//! endpoints speak JSON except downloads, which return raw bytes.

use std::fmt;
use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};
use vidforge_core::catalog::VideoType;
use vidforge_core::generation::{GenerateResponse, GenerateVideoRequest};
use vidforge_core::progress::GenerationProgress;
use vidforge_core::usage::{ElevenLabsUsage, OpenAiUsage, StorageUsage};
use vidforge_core::video::{TopicsData, Video, VideoMetadata, Voice};

/// HTTP client for one video-generation service.
#[derive(Clone)]
pub struct VideoApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("HTTP error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A voice sample was not valid base64.
    #[error("Invalid audio payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

impl ApiError {
    /// HTTP status of a non-2xx response, if that is what failed.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }

    /// Short reason suitable for a user-facing notification.
    ///
    /// Prefers the `error` field the service puts in its JSON error
    /// bodies, falling back to the status line.
    pub fn reason(&self) -> String {
        match self {
            ApiError::Status { status, body } => serde_json::from_str::<ErrorBody>(body)
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("HTTP error! status: {status}")),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Downloadable artifacts of a completed video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Video,
    Thumbnail,
    Metadata,
}

impl AssetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Video => "video",
            AssetKind::Thumbnail => "thumbnail",
            AssetKind::Metadata => "metadata",
        }
    }

    /// Local file name the artifact of `video_name` is saved under.
    pub fn file_name(self, video_name: &str) -> String {
        match self {
            AssetKind::Video => format!("{video_name}.mp4"),
            AssetKind::Thumbnail => format!("{video_name}_thumbnail.jpg"),
            AssetKind::Metadata => format!("{video_name}_metadata.txt"),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<Voice>,
}

#[derive(Serialize)]
struct TestVoiceRequest<'a> {
    voice_id: &'a str,
    video_type: VideoType,
}

#[derive(Deserialize)]
struct TestVoiceResponse {
    audio_base64: String,
}

#[derive(Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

impl VideoApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Service origin, e.g. `http://localhost:5000`. The
    ///   `/api/...` paths are appended to it.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Create an API client whose requests time out after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Service origin this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Curated topic sets per category.
    pub async fn topics(&self) -> Result<TopicsData, ApiError> {
        self.get_json("/api/topics").await
    }

    /// Available narrator voices.
    pub async fn voices(&self) -> Result<Vec<Voice>, ApiError> {
        let response: VoicesResponse = self.get_json("/api/voices").await?;
        Ok(response.voices)
    }

    /// Synthesize a short sample of `voice_id` and return the decoded
    /// audio bytes (MP3).
    pub async fn test_voice(
        &self,
        voice_id: &str,
        video_type: VideoType,
    ) -> Result<Vec<u8>, ApiError> {
        let body = TestVoiceRequest {
            voice_id,
            video_type,
        };
        let response = self
            .client
            .post(self.url("/api/test-voice"))
            .json(&body)
            .send()
            .await?;

        let sample: TestVoiceResponse = Self::parse_response(response).await?;
        Ok(base64::engine::general_purpose::STANDARD.decode(sample.audio_base64.trim())?)
    }

    /// Submit a new generation job.
    ///
    /// Returns the progress token to poll and the accepted video type.
    pub async fn generate(
        &self,
        request: &GenerateVideoRequest,
    ) -> Result<GenerateResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Current progress snapshot of a job.
    pub async fn progress(&self, progress_id: &str) -> Result<GenerationProgress, ApiError> {
        self.get_json(&format!("/api/progress/{progress_id}")).await
    }

    /// Every known video, completed and generating, newest first.
    pub async fn videos(&self) -> Result<Vec<Video>, ApiError> {
        self.get_json("/api/videos").await
    }

    /// Delete a completed video or cancel a generating one.
    ///
    /// Returns the confirmation message from the service.
    pub async fn delete_video(&self, name: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/videos/{name}")))
            .send()
            .await?;

        let body: MessageResponse = Self::parse_response(response).await?;
        Ok(body.message)
    }

    /// Publishing metadata of a completed video.
    pub async fn metadata(&self, name: &str) -> Result<VideoMetadata, ApiError> {
        self.get_json(&format!("/api/metadata/{name}")).await
    }

    pub async fn elevenlabs_usage(&self) -> Result<ElevenLabsUsage, ApiError> {
        self.get_json("/api/elevenlabs/usage").await
    }

    pub async fn openai_usage(&self) -> Result<OpenAiUsage, ApiError> {
        self.get_json("/api/openai/usage").await
    }

    pub async fn storage_usage(&self) -> Result<StorageUsage, ApiError> {
        self.get_json("/api/storage/usage").await
    }

    /// Fetch the raw bytes of one artifact of a completed video.
    pub async fn download(&self, kind: AssetKind, name: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(self.download_url(kind, name))
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Absolute URL of a downloadable artifact.
    pub fn download_url(&self, kind: AssetKind, name: &str) -> String {
        self.url(&format!("/api/download/{}/{name}", kind.as_str()))
    }

    /// Absolute URL of a server-relative media path (as found in
    /// [`Video::video`] and [`Video::thumbnail`]).
    pub fn asset_url(&self, path: &str) -> String {
        self.url(path)
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::parse_response(response).await
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::debug!(status = status.as_u16(), body = %body, "Service returned an error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let api = VideoApi::new("http://localhost:5000/");
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(
            api.download_url(AssetKind::Thumbnail, "why_cats_purr"),
            "http://localhost:5000/api/download/thumbnail/why_cats_purr"
        );
    }

    #[test]
    fn asset_file_names() {
        assert_eq!(AssetKind::Video.file_name("clip"), "clip.mp4");
        assert_eq!(AssetKind::Thumbnail.file_name("clip"), "clip_thumbnail.jpg");
        assert_eq!(AssetKind::Metadata.file_name("clip"), "clip_metadata.txt");
    }

    #[test]
    fn reason_prefers_service_error_field() {
        let err = ApiError::Status {
            status: 429,
            body: r#"{"error": "System busy. Please try again shortly."}"#.into(),
        };
        assert_eq!(err.reason(), "System busy. Please try again shortly.");
        assert_eq!(err.status(), Some(429));

        let err = ApiError::Status {
            status: 502,
            body: "<html>bad gateway</html>".into(),
        };
        assert_eq!(err.reason(), "HTTP error! status: 502");
    }
}
