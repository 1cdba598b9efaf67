//! Per-job bookkeeping for the progress tracker.
//!
//! The ledger is a plain state machine with no I/O. The tracker feeds it
//! one observation at a time and acts on the returned [`Observation`].

use std::collections::{HashMap, HashSet};

use vidforge_core::progress::GenerationProgress;

/// Terminal outcome of a job, reported once per job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Completed,
    Failed,
}

/// What the tracker should do after recording one fetched snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observation {
    /// The fetched snapshot replaced the stored one.
    pub stored: bool,
    /// The job lost its progress record often enough to warrant a
    /// video-list refresh.
    pub refresh_now: bool,
    /// First sighting of a terminal state for this job.
    pub terminal: Option<Terminal>,
}

#[derive(Debug, Default)]
pub struct ProgressLedger {
    snapshots: HashMap<String, GenerationProgress>,
    notified: HashSet<String>,
    refresh_scheduled: HashSet<String>,
    regressions: HashMap<String, u32>,
}

impl ProgressLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched snapshot for `token`.
    ///
    /// A `waiting`/0% snapshot for a job that previously reported progress
    /// is a lost record: it is counted but never stored. Once the count
    /// reaches `threshold` a single refresh is requested.
    pub fn observe(
        &mut self,
        token: &str,
        progress: GenerationProgress,
        threshold: u32,
    ) -> Observation {
        let previous = self.snapshots.get(token).map(|p| p.percentage);

        if progress.is_unknown_marker() && previous.is_some_and(|pct| pct > 0) {
            let count = self.regressions.entry(token.to_string()).or_insert(0);
            *count += 1;
            let refresh_now =
                *count >= threshold && self.refresh_scheduled.insert(token.to_string());
            return Observation {
                refresh_now,
                ..Observation::default()
            };
        }

        self.regressions.remove(token);

        let terminal = if progress.is_completed() {
            Some(Terminal::Completed)
        } else if progress.is_failed() {
            Some(Terminal::Failed)
        } else {
            None
        }
        .filter(|_| self.notified.insert(token.to_string()));

        let stored = match previous {
            Some(pct) => progress.percentage > pct,
            None => true,
        };
        if stored {
            self.snapshots.insert(token.to_string(), progress);
        }

        Observation {
            stored,
            refresh_now: false,
            terminal,
        }
    }

    /// Forget the notified marker, scheduled-refresh marker and regression
    /// count for `token`. The stored snapshot is kept.
    pub fn release(&mut self, token: &str) {
        self.notified.remove(token);
        self.refresh_scheduled.remove(token);
        self.regressions.remove(token);
    }

    /// Drop every entry whose token is not in `tokens`.
    pub fn retain(&mut self, tokens: &HashSet<&str>) {
        self.snapshots.retain(|k, _| tokens.contains(k.as_str()));
        self.notified.retain(|k| tokens.contains(k.as_str()));
        self.refresh_scheduled.retain(|k| tokens.contains(k.as_str()));
        self.regressions.retain(|k, _| tokens.contains(k.as_str()));
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.notified.clear();
        self.refresh_scheduled.clear();
        self.regressions.clear();
    }

    pub fn snapshot(&self, token: &str) -> Option<&GenerationProgress> {
        self.snapshots.get(token)
    }

    pub fn snapshots(&self) -> &HashMap<String, GenerationProgress> {
        &self.snapshots
    }

    /// True when nothing at all is tracked.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
            && self.notified.is_empty()
            && self.refresh_scheduled.is_empty()
            && self.regressions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
