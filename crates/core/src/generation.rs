//! Generation request shapes and topic validation.

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, StylePreset, VideoType, VisualMode};
use crate::error::CoreError;

/// Shortest accepted topic, in characters, after trimming.
pub const MIN_TOPIC_LENGTH: usize = 5;
/// Longest accepted topic, in characters, after trimming.
pub const MAX_TOPIC_LENGTH: usize = 500;

/// Voice used when the caller does not pick one.
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

/// Validate a topic and return it trimmed.
///
/// Length is counted in characters, not bytes.
pub fn validate_topic(topic: &str) -> Result<&str, CoreError> {
    let trimmed = topic.trim();
    let len = trimmed.chars().count();
    if len < MIN_TOPIC_LENGTH {
        return Err(CoreError::Validation(format!(
            "Topic must be at least {MIN_TOPIC_LENGTH} characters"
        )));
    }
    if len > MAX_TOPIC_LENGTH {
        return Err(CoreError::Validation(format!(
            "Topic must be less than {MAX_TOPIC_LENGTH} characters"
        )));
    }
    Ok(trimmed)
}

/// Check that a video type can be requested from the dashboard.
pub fn validate_video_type(video_type: VideoType) -> Result<(), CoreError> {
    if video_type.is_enabled() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{} is not available yet",
            video_type.title()
        )))
    }
}

/// Everything a generation request carries besides the topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub category: Category,
    pub voice_id: String,
    pub video_type: VideoType,
    pub visual_mode: VisualMode,
    pub style_preset: StylePreset,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            category: Category::Custom,
            voice_id: DEFAULT_VOICE_ID.to_string(),
            video_type: VideoType::Standard,
            visual_mode: VisualMode::Stock,
            style_preset: StylePreset::default(),
        }
    }
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateVideoRequest {
    pub topic: String,
    pub category: Category,
    pub voice_id: String,
    pub video_type: VideoType,
    pub generation_mode: VisualMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<String>,
    pub style_preset: StylePreset,
}

impl GenerateVideoRequest {
    /// Build a request from an already-validated topic.
    pub fn new(topic: impl Into<String>, options: &GenerationOptions) -> Self {
        Self {
            topic: topic.into(),
            category: options.category,
            voice_id: options.voice_id.clone(),
            video_type: options.video_type,
            generation_mode: options.visual_mode,
            ai_provider: options.visual_mode.ai_provider().map(str::to_string),
            style_preset: options.style_preset,
        }
    }
}

/// Response of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Token for polling `GET /api/progress/{id}`.
    pub progress_id: String,
    pub video_type: VideoType,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn topic_length_bounds() {
        assert_matches!(validate_topic("abcd"), Err(CoreError::Validation(_)));
        assert_eq!(validate_topic("abcde").unwrap(), "abcde");
        assert!(validate_topic(&"a".repeat(500)).is_ok());
        assert_matches!(validate_topic(&"a".repeat(501)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn topic_is_trimmed_before_measuring() {
        assert_matches!(validate_topic("   abcd   "), Err(CoreError::Validation(_)));
        assert_eq!(validate_topic("  why cats purr \n").unwrap(), "why cats purr");
    }

    #[test]
    fn topic_length_counts_characters() {
        // Five characters, ten bytes.
        assert!(validate_topic("ééééé").is_ok());
    }

    #[test]
    fn stock_request_omits_ai_provider() {
        let request = GenerateVideoRequest::new("Why do cats purr?", &GenerationOptions::default());
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("ai_provider").is_none());
        assert_eq!(json["generation_mode"], "stock");
        assert_eq!(json["style_preset"], "cinematic");
        assert_eq!(json["category"], "custom");
    }

    #[test]
    fn stability_request_names_provider() {
        let options = GenerationOptions {
            visual_mode: VisualMode::Stability,
            ..Default::default()
        };
        let request = GenerateVideoRequest::new("Why do cats purr?", &options);
        assert_eq!(request.ai_provider.as_deref(), Some("stability"));
    }

    #[test]
    fn longform_rejected() {
        assert_matches!(validate_video_type(VideoType::Longform), Err(CoreError::Validation(_)));
        assert!(validate_video_type(VideoType::Shorts).is_ok());
    }
}
