//! The service seam between dashboard logic and the HTTP client.

use async_trait::async_trait;
use vidforge_core::catalog::VideoType;
use vidforge_core::generation::{GenerateResponse, GenerateVideoRequest};
use vidforge_core::progress::GenerationProgress;
use vidforge_core::usage::{ElevenLabsUsage, OpenAiUsage, StorageUsage};
use vidforge_core::video::{TopicsData, Video, VideoMetadata, Voice};

use crate::api::{ApiError, AssetKind, VideoApi};

/// Operations the dashboard needs from the video-generation service.
///
/// [`VideoApi`] is the production implementation.
#[async_trait]
pub trait VideoService: Send + Sync {
    async fn topics(&self) -> Result<TopicsData, ApiError>;

    async fn voices(&self) -> Result<Vec<Voice>, ApiError>;

    async fn test_voice(&self, voice_id: &str, video_type: VideoType)
        -> Result<Vec<u8>, ApiError>;

    async fn generate(&self, request: &GenerateVideoRequest)
        -> Result<GenerateResponse, ApiError>;

    async fn progress(&self, progress_id: &str) -> Result<GenerationProgress, ApiError>;

    async fn videos(&self) -> Result<Vec<Video>, ApiError>;

    async fn delete_video(&self, name: &str) -> Result<String, ApiError>;

    async fn metadata(&self, name: &str) -> Result<VideoMetadata, ApiError>;

    async fn elevenlabs_usage(&self) -> Result<ElevenLabsUsage, ApiError>;

    async fn openai_usage(&self) -> Result<OpenAiUsage, ApiError>;

    async fn storage_usage(&self) -> Result<StorageUsage, ApiError>;

    async fn download(&self, kind: AssetKind, name: &str) -> Result<Vec<u8>, ApiError>;
}

#[async_trait]
impl VideoService for VideoApi {
    async fn topics(&self) -> Result<TopicsData, ApiError> {
        VideoApi::topics(self).await
    }

    async fn voices(&self) -> Result<Vec<Voice>, ApiError> {
        VideoApi::voices(self).await
    }

    async fn test_voice(
        &self,
        voice_id: &str,
        video_type: VideoType,
    ) -> Result<Vec<u8>, ApiError> {
        VideoApi::test_voice(self, voice_id, video_type).await
    }

    async fn generate(
        &self,
        request: &GenerateVideoRequest,
    ) -> Result<GenerateResponse, ApiError> {
        VideoApi::generate(self, request).await
    }

    async fn progress(&self, progress_id: &str) -> Result<GenerationProgress, ApiError> {
        VideoApi::progress(self, progress_id).await
    }

    async fn videos(&self) -> Result<Vec<Video>, ApiError> {
        VideoApi::videos(self).await
    }

    async fn delete_video(&self, name: &str) -> Result<String, ApiError> {
        VideoApi::delete_video(self, name).await
    }

    async fn metadata(&self, name: &str) -> Result<VideoMetadata, ApiError> {
        VideoApi::metadata(self, name).await
    }

    async fn elevenlabs_usage(&self) -> Result<ElevenLabsUsage, ApiError> {
        VideoApi::elevenlabs_usage(self).await
    }

    async fn openai_usage(&self) -> Result<OpenAiUsage, ApiError> {
        VideoApi::openai_usage(self).await
    }

    async fn storage_usage(&self) -> Result<StorageUsage, ApiError> {
        VideoApi::storage_usage(self).await
    }

    async fn download(&self, kind: AssetKind, name: &str) -> Result<Vec<u8>, ApiError> {
        VideoApi::download(self, kind, name).await
    }
}
