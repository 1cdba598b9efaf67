//! User-facing notifications for the vidforge dashboard.
//!
//! - [`Notification`]: a transient message with a [`Severity`].
//! - [`NotificationCenter`]: holds the single visible notification and
//!   fans every notification out over a `tokio::sync::broadcast` channel.

pub mod center;
pub mod notification;

pub use center::NotificationCenter;
pub use notification::{Notification, Severity};
