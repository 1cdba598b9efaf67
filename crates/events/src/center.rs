//! Single-slot notification center backed by a `tokio::sync::broadcast`
//! channel.
//!
//! At most one notification is visible at a time. Showing a new one
//! replaces the old one, and each is cleared after the center's
//! time-to-live unless something newer replaced it first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::notification::{Notification, Severity};

/// How long a notification stays visible by default.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Buffer capacity for the broadcast feed.
const FEED_CAPACITY: usize = 64;

/// Holds the visible notification and publishes every notification shown.
///
/// Share it via `Arc`. Dropping the center cancels pending dismiss timers.
pub struct NotificationCenter {
    sender: broadcast::Sender<Notification>,
    current: Arc<Mutex<Option<Notification>>>,
    next_id: AtomicU64,
    ttl: Duration,
    cancel: CancellationToken,
}

impl NotificationCenter {
    /// Create a center whose notifications auto-dismiss after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            sender,
            current: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(1),
            ttl,
            cancel: CancellationToken::new(),
        }
    }

    /// Show a notification, replacing whatever is visible.
    ///
    /// The dismiss timer needs a Tokio runtime; outside one the
    /// notification stays until replaced or [`dismiss`](Self::dismiss)ed.
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> Notification {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification::new(id, message, severity);

        match severity {
            Severity::Error => {
                tracing::warn!(id, message = %notification.message, "Notification")
            }
            _ => tracing::info!(id, severity = %severity, message = %notification.message, "Notification"),
        }

        *lock(&self.current) = Some(notification.clone());
        // No subscribers is fine; the visible slot is still updated.
        let _ = self.sender.send(notification.clone());

        self.schedule_dismiss(id);
        notification
    }

    /// The visible notification, if any.
    pub fn current(&self) -> Option<Notification> {
        lock(&self.current).clone()
    }

    /// Clear the visible notification immediately.
    pub fn dismiss(&self) {
        *lock(&self.current) = None;
    }

    /// Subscribe to every notification shown from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    /// Time-to-live of each notification.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn schedule_dismiss(&self, id: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(id, "No runtime; notification will not auto-dismiss");
            return;
        };

        let current = Arc::clone(&self.current);
        let cancel = self.cancel.clone();
        let ttl = self.ttl;

        handle.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(ttl) => {}
            }
            let mut slot = lock(&current);
            // A newer notification owns the slot; leave it alone.
            if slot.as_ref().is_some_and(|n| n.id == id) {
                *slot = None;
            }
        });
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn lock(slot: &Mutex<Option<Notification>>) -> std::sync::MutexGuard<'_, Option<Notification>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
