use std::time::Duration;

use tokio::time::Instant;
use vidforge_core::video::Video;

/// How long a freshly submitted job may stay unlisted before watching
/// gives up on it.
pub const JOB_APPEAR_TIMEOUT: Duration = Duration::from_secs(30);

/// Decides when a watch session with `--exit-when-idle` may end.
///
/// A job that was just submitted only shows up in the video list once the
/// service has created its project, so an empty list right after
/// submission does not count as idle until that job has been seen or
/// `timeout` has passed.
#[derive(Debug, Clone)]
pub struct IdleGate {
    exit_when_idle: bool,
    awaiting: Option<String>,
    deadline: Instant,
}

impl IdleGate {
    pub fn new(exit_when_idle: bool) -> Self {
        Self {
            exit_when_idle,
            awaiting: None,
            deadline: Instant::now(),
        }
    }

    /// Exit when idle, but only after `progress_id` has been listed as
    /// generating or `timeout` has elapsed.
    pub fn awaiting(progress_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            exit_when_idle: true,
            awaiting: Some(progress_id.into()),
            deadline: Instant::now() + timeout,
        }
    }

    /// Still waiting for the submitted job to appear.
    pub fn is_waiting(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn should_exit(&mut self, generating: &[Video]) -> bool {
        if let Some(progress_id) = &self.awaiting {
            let listed = generating
                .iter()
                .any(|v| v.progress_id.as_deref() == Some(progress_id.as_str()));
            if listed {
                self.awaiting = None;
            } else if Instant::now() < self.deadline {
                return false;
            } else {
                tracing::warn!(%progress_id, "Submitted job never appeared as generating");
                self.awaiting = None;
            }
        }
        self.exit_when_idle && generating.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use vidforge_core::video::VideoStatus;

    use super::*;

    fn generating(progress_id: &str) -> Video {
        Video {
            name: "why_cats_purr".to_string(),
            display_name: "why cats purr".to_string(),
            video: None,
            thumbnail: None,
            size_mb: 0.0,
            duration: None,
            duration_formatted: None,
            created: 1_700_000_000,
            status: VideoStatus::Generating,
            has_metadata: false,
            progress_id: Some(progress_id.to_string()),
            video_type: None,
        }
    }

    #[test]
    fn plain_watch_exits_only_when_asked() {
        assert!(IdleGate::new(true).should_exit(&[]));
        assert!(!IdleGate::new(false).should_exit(&[]));
        assert!(!IdleGate::new(true).should_exit(&[generating("p1")]));
    }

    #[tokio::test(start_paused = true)]
    async fn submitted_job_must_appear_before_idle_counts() {
        let mut gate = IdleGate::awaiting("f00dcafe", JOB_APPEAR_TIMEOUT);

        // Not listed yet: an empty list is not idle.
        assert!(!gate.should_exit(&[]));
        assert!(gate.is_waiting());

        assert!(!gate.should_exit(&[generating("f00dcafe")]));
        assert!(!gate.is_waiting());

        // Finished and gone from the generating list.
        assert!(gate.should_exit(&[]));
    }

    #[tokio::test(start_paused = true)]
    async fn job_that_never_appears_times_out() {
        let mut gate = IdleGate::awaiting("f00dcafe", Duration::from_secs(10));
        assert!(!gate.should_exit(&[]));

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(gate.should_exit(&[]));
    }

    #[tokio::test(start_paused = true)]
    async fn other_jobs_do_not_satisfy_the_wait() {
        let mut gate = IdleGate::awaiting("f00dcafe", JOB_APPEAR_TIMEOUT);
        assert!(!gate.should_exit(&[generating("older")]));
        assert!(gate.is_waiting());
    }
}
