//! `vidforge-dashboard` library crate.
//!
//! The client-side state of the dashboard: the shared [`AppState`],
//! the [`ProgressTracker`] that polls in-flight generations, the
//! [`GenerationDispatcher`] that submits new ones, and library and
//! download operations. The `vidforge` binary lives in `main.rs`.

pub mod config;
pub mod dispatcher;
pub mod downloads;
pub mod library;
pub mod state;
pub mod tracker;
pub mod watch;

pub use config::DashboardConfig;
pub use dispatcher::{DispatchError, GenerationDispatcher};
pub use downloads::{DownloadError, Downloader};
pub use library::VideoLibrary;
pub use state::AppState;
pub use tracker::{ProgressTracker, TrackedJob, TrackerConfig};
pub use watch::IdleGate;
