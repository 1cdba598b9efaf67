//! Progress tracking for in-flight generation jobs.
//!
//! [`ProgressTracker`] polls the service for every job that carries a
//! progress token, keeps the last known snapshot per job, raises one
//! notification per terminal job and asks for a video-list refresh when a
//! job's progress record disappears on the service side.
//!
//! Each activation owns a session token. Restarting with a different job
//! list swaps the poll loop (a child token of the session) but keeps the
//! session, so delayed follow-ups scheduled before the restart still run.
//! Stopping cancels the session and everything under it.

mod ledger;

pub use ledger::{Observation, ProgressLedger, Terminal};

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::join_all;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use vidforge_core::catalog::VideoType;
use vidforge_core::progress::GenerationProgress;
use vidforge_core::video::Video;
use vidforge_events::Severity;

use crate::state::AppState;

/// Tracker timing and thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Delay between polling cycles.
    pub poll_interval: Duration,
    /// Consecutive lost-progress observations before a refresh.
    pub regression_threshold: u32,
    /// Wait after a completion before releasing the job and refreshing.
    pub completion_refresh_delay: Duration,
    /// Wait after a failure before releasing the job and refreshing.
    pub error_refresh_delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            regression_threshold: 2,
            completion_refresh_delay: Duration::from_secs(2),
            error_refresh_delay: Duration::from_secs(1),
        }
    }
}

/// A job the tracker should follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedJob {
    /// Jobs without a token are listed but never polled.
    pub progress_id: Option<String>,
    pub display_name: String,
    pub video_type: Option<VideoType>,
}

impl From<&Video> for TrackedJob {
    fn from(video: &Video) -> Self {
        Self {
            progress_id: video.progress_id.clone(),
            display_name: video.display_name.clone(),
            video_type: video.video_type,
        }
    }
}

pub struct ProgressTracker {
    inner: Arc<TrackerInner>,
    active: Mutex<Option<Activation>>,
}

struct TrackerInner {
    state: Arc<AppState>,
    config: TrackerConfig,
    ledger: Mutex<ProgressLedger>,
}

struct Activation {
    /// Progress tokens of the current job list, in order.
    key: Vec<Option<String>>,
    session: CancellationToken,
    poll: CancellationToken,
}

/// Side effects collected under the ledger lock and spawned after it.
enum Effect {
    Refresh,
    FollowUp { token: String, delay: Duration },
}

impl ProgressTracker {
    /// A zero `poll_interval` is replaced by the default.
    pub fn new(state: Arc<AppState>, mut config: TrackerConfig) -> Self {
        if config.poll_interval.is_zero() {
            config.poll_interval = TrackerConfig::default().poll_interval;
            tracing::warn!(
                poll_interval = ?config.poll_interval,
                "Zero poll interval replaced by default"
            );
        }
        Self {
            inner: Arc::new(TrackerInner {
                state,
                config,
                ledger: Mutex::new(ProgressLedger::new()),
            }),
            active: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.inner.config
    }

    /// Replace the set of jobs being tracked.
    ///
    /// An empty list stops tracking. The same token list as the running
    /// one is a no-op. Otherwise the running poll loop is cancelled, state
    /// for tokens no longer present is evicted, and a fresh loop starts
    /// with an immediate cycle. Must be called inside a Tokio runtime.
    pub fn set_jobs(&self, jobs: Vec<TrackedJob>) {
        if jobs.is_empty() {
            self.stop();
            return;
        }

        let key: Vec<Option<String>> = jobs.iter().map(|j| j.progress_id.clone()).collect();
        let mut active = lock(&self.active);

        if active.as_ref().is_some_and(|a| a.key == key) {
            return;
        }

        let session = match active.take() {
            Some(previous) => {
                previous.poll.cancel();
                previous.session
            }
            None => CancellationToken::new(),
        };

        {
            let keep: HashSet<&str> = key.iter().flatten().map(String::as_str).collect();
            lock(&self.inner.ledger).retain(&keep);
        }

        let poll = session.child_token();
        tracing::info!(jobs = jobs.len(), "Progress tracking started");

        tokio::spawn(poll_loop(
            Arc::clone(&self.inner),
            jobs,
            session.clone(),
            poll.clone(),
        ));

        *active = Some(Activation { key, session, poll });
    }

    /// Stop polling and forget every tracked job. Idempotent.
    pub fn stop(&self) {
        let Some(activation) = lock(&self.active).take() else {
            return;
        };
        activation.session.cancel();
        lock(&self.inner.ledger).clear();
        tracing::info!("Progress tracking stopped");
    }

    /// Track whatever the application state lists as generating until
    /// `cancel` fires, then stop.
    pub async fn follow(&self, cancel: CancellationToken) {
        let mut videos = self.inner.state.subscribe_videos();
        loop {
            let jobs: Vec<TrackedJob> = videos
                .borrow_and_update()
                .iter()
                .filter(|v| v.is_generating())
                .map(TrackedJob::from)
                .collect();
            self.set_jobs(jobs);

            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = videos.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        self.stop();
    }

    /// Last known snapshot for a progress token.
    pub fn snapshot(&self, token: &str) -> Option<GenerationProgress> {
        lock(&self.inner.ledger).snapshot(token).cloned()
    }

    pub fn snapshots(&self) -> HashMap<String, GenerationProgress> {
        lock(&self.inner.ledger).snapshots().clone()
    }

    pub fn is_active(&self) -> bool {
        lock(&self.active).is_some()
    }

    /// Progress tokens of the current job list.
    pub fn tracked_tokens(&self) -> Vec<String> {
        lock(&self.active)
            .as_ref()
            .map(|a| a.key.iter().flatten().cloned().collect())
            .unwrap_or_default()
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if let Some(activation) = lock(&self.active).take() {
            activation.session.cancel();
        }
    }
}

// ---- polling ----

async fn poll_loop(
    inner: Arc<TrackerInner>,
    jobs: Vec<TrackedJob>,
    session: CancellationToken,
    poll: CancellationToken,
) {
    let mut ticker = tokio::time::interval(inner.config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = poll.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            _ = poll.cancelled() => break,
            _ = inner.run_cycle(&jobs, &session, &poll) => {}
        }
    }
    tracing::debug!("Poll loop exited");
}

impl TrackerInner {
    async fn run_cycle(
        self: &Arc<Self>,
        jobs: &[TrackedJob],
        session: &CancellationToken,
        poll: &CancellationToken,
    ) {
        let polled: Vec<(&TrackedJob, &str)> = jobs
            .iter()
            .filter_map(|job| job.progress_id.as_deref().map(|token| (job, token)))
            .collect();

        let service = self.state.service();
        let results = join_all(polled.iter().map(|(_, token)| service.progress(token))).await;

        let effects = {
            let mut ledger = lock(&self.ledger);
            if poll.is_cancelled() {
                return;
            }

            let mut effects = Vec::new();
            for ((job, token), result) in polled.iter().zip(results) {
                let progress = match result {
                    Ok(progress) => progress,
                    Err(e) => {
                        tracing::warn!(progress_id = %token, error = %e, "Error checking progress");
                        continue;
                    }
                };

                let observation =
                    ledger.observe(token, progress, self.config.regression_threshold);

                if observation.refresh_now {
                    tracing::info!(progress_id = %token, "Progress record lost; refreshing videos");
                    effects.push(Effect::Refresh);
                }
                // Shown under the lock so nothing is announced once a
                // concurrent stop has cleared the ledger.
                if let Some(outcome) = observation.terminal {
                    let delay = self.announce(&job.display_name, outcome);
                    effects.push(Effect::FollowUp {
                        token: token.to_string(),
                        delay,
                    });
                }
            }
            effects
        };

        for effect in effects {
            match effect {
                Effect::Refresh => self.spawn_refresh(session, Duration::ZERO, None),
                Effect::FollowUp { token, delay } => {
                    self.spawn_refresh(session, delay, Some(token))
                }
            }
        }
    }

    /// Show the terminal notification for a job and return how long to
    /// wait before its follow-up.
    fn announce(&self, display_name: &str, outcome: Terminal) -> Duration {
        match outcome {
            Terminal::Completed => {
                self.state.show_notification(
                    format!("Video completed: \"{display_name}\""),
                    Severity::Success,
                );
                self.config.completion_refresh_delay
            }
            Terminal::Failed => {
                self.state.show_notification(
                    format!("Generation failed: \"{display_name}\""),
                    Severity::Error,
                );
                self.config.error_refresh_delay
            }
        }
    }

    /// Refresh the video list after `delay`, first releasing `token`'s
    /// markers if given. Skipped once the session is cancelled.
    fn spawn_refresh(
        self: &Arc<Self>,
        session: &CancellationToken,
        delay: Duration,
        token: Option<String>,
    ) {
        let inner = Arc::clone(self);
        let session = session.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = session.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            if let Some(token) = token {
                let mut ledger = lock(&inner.ledger);
                if session.is_cancelled() {
                    return;
                }
                ledger.release(&token);
            }
            inner.state.refresh_videos().await;
        });
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
