//! REST client for the video-generation service.
//!
//! [`VideoApi`](api::VideoApi) wraps every HTTP endpoint the dashboard
//! consumes. The [`VideoService`](service::VideoService) trait is the
//! seam the rest of the workspace programs against, so tracking and
//! dispatch logic can run against a scripted service in tests.

pub mod api;
pub mod service;

pub use api::{ApiError, AssetKind, VideoApi};
pub use service::VideoService;
