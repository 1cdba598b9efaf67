//! Catalog enums offered by the generation form.
//!
//! Each enum serializes to the exact string the generation API expects
//! and parses back from it (case-insensitive, surrounding whitespace
//! ignored), reporting [`CoreError::Validation`] for unknown values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Video type
// ---------------------------------------------------------------------------

/// Output format of a generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    Shorts,
    Standard,
    Longform,
}

impl VideoType {
    pub const ALL: [VideoType; 3] = [VideoType::Shorts, VideoType::Standard, VideoType::Longform];

    pub fn as_str(self) -> &'static str {
        match self {
            VideoType::Shorts => "shorts",
            VideoType::Standard => "standard",
            VideoType::Longform => "longform",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            VideoType::Shorts => "YouTube Shorts",
            VideoType::Standard => "Standard Video",
            VideoType::Longform => "Long-Form Content",
        }
    }

    /// Human-readable target duration range.
    pub fn duration_label(self) -> &'static str {
        match self {
            VideoType::Shorts => "30-60 sec",
            VideoType::Standard => "2-4 min",
            VideoType::Longform => "30min-5hr",
        }
    }

    /// Long-form output is gated behind beta access and cannot be
    /// requested from the dashboard.
    pub fn is_enabled(self) -> bool {
        !matches!(self, VideoType::Longform)
    }

    /// Short badge shown next to an active generation.
    pub fn badge(self) -> &'static str {
        match self {
            VideoType::Shorts => "SHORT",
            VideoType::Standard | VideoType::Longform => "STANDARD",
        }
    }
}

// ---------------------------------------------------------------------------
// Visual mode
// ---------------------------------------------------------------------------

/// Where the visuals of a generated video come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualMode {
    /// AI-generated images.
    Stability,
    /// Copyright-free stock footage and photos.
    Stock,
}

impl VisualMode {
    pub const ALL: [VisualMode; 2] = [VisualMode::Stability, VisualMode::Stock];

    pub fn as_str(self) -> &'static str {
        match self {
            VisualMode::Stability => "stability",
            VisualMode::Stock => "stock",
        }
    }

    /// The image provider to request, if any. Stock media needs none.
    pub fn ai_provider(self) -> Option<&'static str> {
        match self {
            VisualMode::Stock => None,
            other => Some(other.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Topic category a generation request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Why,
    WhatIf,
    HiddenTruths,
    Custom,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::WhatIf,
        Category::Why,
        Category::HiddenTruths,
        Category::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Why => "why",
            Category::WhatIf => "what_if",
            Category::HiddenTruths => "hidden_truths",
            Category::Custom => "custom",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Why => "Why Does This Happen?",
            Category::WhatIf => "What If...?",
            Category::HiddenTruths => "Hidden Truths",
            Category::Custom => "Custom Topic",
        }
    }
}

// ---------------------------------------------------------------------------
// Style preset
// ---------------------------------------------------------------------------

/// Image style applied when visuals are AI-generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylePreset {
    #[default]
    Cinematic,
    Photographic,
    Anime,
    FantasyArt,
    DigitalArt,
    ComicBook,
    AnalogFilm,
    #[serde(rename = "3d-model")]
    Model3d,
    LineArt,
    LowPoly,
    NeonPunk,
}

impl StylePreset {
    pub const ALL: [StylePreset; 11] = [
        StylePreset::Cinematic,
        StylePreset::Photographic,
        StylePreset::Anime,
        StylePreset::FantasyArt,
        StylePreset::DigitalArt,
        StylePreset::ComicBook,
        StylePreset::AnalogFilm,
        StylePreset::Model3d,
        StylePreset::LineArt,
        StylePreset::LowPoly,
        StylePreset::NeonPunk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StylePreset::Cinematic => "cinematic",
            StylePreset::Photographic => "photographic",
            StylePreset::Anime => "anime",
            StylePreset::FantasyArt => "fantasy-art",
            StylePreset::DigitalArt => "digital-art",
            StylePreset::ComicBook => "comic-book",
            StylePreset::AnalogFilm => "analog-film",
            StylePreset::Model3d => "3d-model",
            StylePreset::LineArt => "line-art",
            StylePreset::LowPoly => "low-poly",
            StylePreset::NeonPunk => "neon-punk",
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn parse_known<T: Copy>(
    kind: &str,
    raw: &str,
    all: &[T],
    name: impl Fn(T) -> &'static str,
) -> Result<T, CoreError> {
    let wanted = raw.trim().to_lowercase();
    all.iter()
        .copied()
        .find(|v| name(*v) == wanted)
        .ok_or_else(|| {
            let valid: Vec<&str> = all.iter().map(|v| name(*v)).collect();
            CoreError::Validation(format!(
                "Invalid {kind} '{raw}'. Must be one of: {}",
                valid.join(", ")
            ))
        })
}

macro_rules! catalog_str_impls {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_known($kind, s, &<$ty>::ALL, <$ty>::as_str)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

catalog_str_impls!(VideoType, "video type");
catalog_str_impls!(VisualMode, "visual mode");
catalog_str_impls!(Category, "category");
catalog_str_impls!(StylePreset, "style preset");

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
