//! Video library records, topic sets, voices, and publishing metadata.

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, VideoType};

/// Whether a library entry is finished or still being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Completed,
    Generating,
}

/// One entry of `GET /api/videos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Project directory name; the key for delete/metadata/download.
    pub name: String,
    pub display_name: String,
    /// Server-relative path of the rendered file.
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub size_mb: f64,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub duration_formatted: Option<String>,
    /// Unix seconds.
    pub created: i64,
    pub status: VideoStatus,
    #[serde(default)]
    pub has_metadata: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_type: Option<VideoType>,
}

impl Video {
    pub fn is_generating(&self) -> bool {
        self.status == VideoStatus::Generating
    }
}

/// A curated topic and whether a video was already made for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Curated topics per category (`GET /api/topics`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsData {
    #[serde(default)]
    pub why: Vec<Topic>,
    #[serde(default)]
    pub what_if: Vec<Topic>,
    #[serde(default)]
    pub hidden_truths: Vec<Topic>,
}

impl TopicsData {
    /// Curated topics for a category. `Custom` has none.
    pub fn for_category(&self, category: Category) -> &[Topic] {
        match category {
            Category::Why => &self.why,
            Category::WhatIf => &self.what_if,
            Category::HiddenTruths => &self.hidden_truths,
            Category::Custom => &[],
        }
    }

    /// Topics of a category that have not been turned into a video yet.
    pub fn remaining(&self, category: Category) -> impl Iterator<Item = &Topic> {
        self.for_category(category).iter().filter(|t| !t.completed)
    }
}

/// A narrator voice (`GET /api/voices`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Video types and categories this voice suits.
    #[serde(default)]
    pub recommended_for: Vec<String>,
}

/// Publishing metadata for a completed video (`GET /api/metadata/{name}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub timestamps: Option<Vec<String>>,
    pub video_type: VideoType,
    #[serde(default)]
    pub original_topic: Option<String>,
}
