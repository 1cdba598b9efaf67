//! Progress snapshots reported by `GET /api/progress/{id}`.

use serde::{Deserialize, Serialize};

use crate::catalog::VideoType;

/// Lifecycle state of a generation job as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    /// The service has no record of the job (yet, or any more).
    Waiting,
    Processing,
    Completed,
    Error,
}

/// A point-in-time view of one generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationProgress {
    /// Label of the pipeline step currently running.
    pub step: String,
    /// Completion percentage (0-100).
    pub percentage: u8,
    pub status: ProgressStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_type: Option<VideoType>,
    /// Free-text detail for the current step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl GenerationProgress {
    /// Build a bare snapshot with no optional fields.
    pub fn new(step: impl Into<String>, percentage: u8, status: ProgressStatus) -> Self {
        Self {
            step: step.into(),
            percentage,
            status,
            topic: None,
            video_type: None,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// The placeholder the service returns for an unknown token:
    /// `waiting` at 0%.
    pub fn is_unknown_marker(&self) -> bool {
        self.status == ProgressStatus::Waiting && self.percentage == 0
    }

    /// Finished successfully. Requires both the status and a full 100%.
    pub fn is_completed(&self) -> bool {
        self.status == ProgressStatus::Completed && self.percentage == 100
    }

    pub fn is_failed(&self) -> bool {
        self.status == ProgressStatus::Error
    }
}
