//! Account and storage usage snapshots.
//!
//! The usage endpoints proxy third-party accounts and return partial
//! shapes when data is unavailable, so every field defaults.

use serde::{Deserialize, Serialize};

/// Narration character quota (`GET /api/elevenlabs/usage`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElevenLabsUsage {
    #[serde(default)]
    pub character_count: u64,
    #[serde(default)]
    pub character_limit: u64,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub status: String,
}

impl ElevenLabsUsage {
    /// Share of the character quota used, in percent. Zero when the
    /// limit is unknown.
    pub fn percent_used(&self) -> f64 {
        if self.character_limit == 0 {
            return 0.0;
        }
        (self.character_count as f64 / self.character_limit as f64) * 100.0
    }

    pub fn characters_remaining(&self) -> u64 {
        self.character_limit.saturating_sub(self.character_count)
    }
}

/// Script-writing account status (`GET /api/openai/usage`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAiUsage {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub current_month: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoTypeCounts {
    #[serde(default)]
    pub standard: u64,
    #[serde(default)]
    pub shorts: u64,
}

/// Disk used by generated projects (`GET /api/storage/usage`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageUsage {
    #[serde(default)]
    pub total_size_bytes: u64,
    #[serde(default)]
    pub total_size_mb: f64,
    #[serde(default)]
    pub total_size_gb: f64,
    #[serde(default)]
    pub video_count: u64,
    #[serde(default)]
    pub video_type_counts: VideoTypeCounts,
}

/// All three usage panels, loaded together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageSnapshot {
    pub elevenlabs: Option<ElevenLabsUsage>,
    pub openai: Option<OpenAiUsage>,
    pub storage: Option<StorageUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_storage_shape_parses() {
        let json = r#"{"total_size_bytes": 0, "video_count": 0, "projects": []}"#;
        let usage: StorageUsage = serde_json::from_str(json).unwrap();
        assert_eq!(usage.video_count, 0);
        assert_eq!(usage.video_type_counts, VideoTypeCounts::default());
    }

    #[test]
    fn percent_used_handles_unknown_limit() {
        let usage = ElevenLabsUsage::default();
        assert_eq!(usage.percent_used(), 0.0);

        let usage = ElevenLabsUsage {
            character_count: 2_500,
            character_limit: 10_000,
            ..Default::default()
        };
        assert_eq!(usage.percent_used(), 25.0);
        assert_eq!(usage.characters_remaining(), 7_500);
    }
}
