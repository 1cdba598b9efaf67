mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use tokio::time::sleep;

use common::{drain, state_with, ScriptedService};
use vidforge_client::ApiError;
use vidforge_core::catalog::{Category, VideoType, VisualMode};
use vidforge_core::generation::GenerationOptions;
use vidforge_dashboard::{AppState, DispatchError, GenerationDispatcher};
use vidforge_events::Severity;

fn dispatcher(service: &Arc<ScriptedService>) -> (GenerationDispatcher, Arc<AppState>) {
    let state = state_with(service);
    (
        GenerationDispatcher::new(Arc::clone(&state), Duration::from_secs(2)),
        state,
    )
}

// ---------------------------------------------------------------------------
// Test: topic length boundaries
// ---------------------------------------------------------------------------

/// Four characters is rejected locally and never reaches the service.
#[tokio::test]
async fn short_topic_is_rejected_without_network_call() {
    let service = ScriptedService::new();
    let (dispatcher, state) = dispatcher(&service);
    let mut feed = state.notifications().subscribe();

    let result = dispatcher
        .start_generation("  abcd  ", &GenerationOptions::default())
        .await;

    assert_matches!(result, Err(DispatchError::Validation(_)));
    assert_eq!(service.generate_calls(), 0);

    let notifications = drain(&mut feed);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Error);
    assert_eq!(notifications[0].message, "Topic must be at least 5 characters");
}

#[tokio::test]
async fn topic_length_boundaries() {
    let service = ScriptedService::new();
    let (dispatcher, state) = dispatcher(&service);
    let mut feed = state.notifications().subscribe();
    let options = GenerationOptions::default();

    assert!(dispatcher.start_generation("abcde", &options).await.is_ok());
    assert!(dispatcher
        .start_generation(&"x".repeat(500), &options)
        .await
        .is_ok());
    assert_matches!(
        dispatcher.start_generation(&"x".repeat(501), &options).await,
        Err(DispatchError::Validation(_))
    );
    assert_eq!(service.generate_calls(), 2);

    let last = drain(&mut feed).pop().unwrap();
    assert_eq!(last.message, "Topic must be less than 500 characters");
}

/// Length is counted in characters, so multi-byte topics are not penalised.
#[tokio::test]
async fn topic_length_counts_characters() {
    let service = ScriptedService::new();
    let (dispatcher, _state) = dispatcher(&service);

    let result = dispatcher
        .start_generation("ĉŝĝĥĵ", &GenerationOptions::default())
        .await;
    assert!(result.is_ok());
}

// ---------------------------------------------------------------------------
// Test: request shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stock_mode_sends_trimmed_topic_without_provider() {
    let service = ScriptedService::new();
    let (dispatcher, _state) = dispatcher(&service);
    let options = GenerationOptions {
        category: Category::Why,
        video_type: VideoType::Shorts,
        visual_mode: VisualMode::Stock,
        ..Default::default()
    };

    let response = dispatcher
        .start_generation("  Why do cats purr?  ", &options)
        .await
        .unwrap();
    assert_eq!(response.progress_id, "f00dcafe");
    assert_eq!(response.video_type, VideoType::Shorts);

    let request = service.last_request().unwrap();
    assert_eq!(request.topic, "Why do cats purr?");
    assert_eq!(request.category, Category::Why);
    assert_eq!(request.generation_mode, VisualMode::Stock);
    assert_eq!(request.ai_provider, None);
}

#[tokio::test]
async fn stability_mode_names_the_provider() {
    let service = ScriptedService::new();
    let (dispatcher, _state) = dispatcher(&service);
    let options = GenerationOptions {
        visual_mode: VisualMode::Stability,
        ..Default::default()
    };

    dispatcher
        .start_generation("What if the moon vanished?", &options)
        .await
        .unwrap();

    let request = service.last_request().unwrap();
    assert_eq!(request.ai_provider.as_deref(), Some("stability"));
}

#[tokio::test]
async fn longform_is_rejected_locally() {
    let service = ScriptedService::new();
    let (dispatcher, _state) = dispatcher(&service);
    let options = GenerationOptions {
        video_type: VideoType::Longform,
        ..Default::default()
    };

    let result = dispatcher
        .start_generation("The history of timekeeping", &options)
        .await;
    assert_matches!(result, Err(DispatchError::Validation(_)));
    assert_eq!(service.generate_calls(), 0);
}

// ---------------------------------------------------------------------------
// Test: outcomes and notifications
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn accepted_job_notifies_and_refreshes_once_after_delay() {
    let service = ScriptedService::new();
    let (dispatcher, state) = dispatcher(&service);
    let mut feed = state.notifications().subscribe();

    dispatcher
        .start_generation("Why is the sky blue?", &GenerationOptions::default())
        .await
        .unwrap();

    let notifications = drain(&mut feed);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Info);
    assert_eq!(notifications[0].message, "Started generating: \"Why is the sky blue?\"");

    sleep(Duration::from_secs(1)).await;
    assert_eq!(service.video_calls(), 0);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(service.video_calls(), 1);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(service.video_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn rejected_job_reports_service_reason() {
    let service = ScriptedService::new();
    service.fail("generate", r#"{"error": "Out of ElevenLabs credits"}"#);
    let (dispatcher, state) = dispatcher(&service);
    let mut feed = state.notifications().subscribe();

    let result = dispatcher
        .start_generation("Why do cats purr?", &GenerationOptions::default())
        .await;

    assert_matches!(
        result,
        Err(DispatchError::Api(ApiError::Status { status: 500, .. }))
    );

    let notifications = drain(&mut feed);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Error);
    assert_eq!(notifications[0].message, "Failed to start: Out of ElevenLabs credits");

    // No refresh for a job that never started.
    sleep(Duration::from_secs(5)).await;
    assert_eq!(service.video_calls(), 0);
}
