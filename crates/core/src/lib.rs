//! Domain types shared by every vidforge crate.
//!
//! Wire shapes for the video-generation API, catalog enums (video
//! format, visual source, category, style preset), input validation,
//! and the [`CoreError`](error::CoreError) type.

pub mod catalog;
pub mod error;
pub mod generation;
pub mod progress;
pub mod usage;
pub mod video;
