//! `vidforge` command-line dashboard.
//!
//! Talks to a running video-generation service. Configuration comes from
//! `VIDFORGE_*` environment variables (see [`DashboardConfig::from_env`]),
//! optionally loaded from a `.env` file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use vidforge_client::{AssetKind, VideoApi};
use vidforge_core::catalog::{Category, StylePreset, VideoType, VisualMode};
use vidforge_core::generation::{GenerationOptions, DEFAULT_VOICE_ID};
use vidforge_dashboard::watch::JOB_APPEAR_TIMEOUT;
use vidforge_dashboard::{
    AppState, DashboardConfig, Downloader, GenerationDispatcher, IdleGate, ProgressTracker,
    VideoLibrary,
};
use vidforge_events::{Notification, NotificationCenter, Severity};

#[derive(Parser, Debug)]
#[command(author, version, about = "Video generation dashboard")]
struct Cli {
    /// Service base URL; overrides VIDFORGE_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List suggested topics per category.
    Topics,
    /// List available narration voices.
    Voices,
    /// List videos, newest first.
    Videos,
    /// Show API and storage usage.
    Usage,
    /// Start generating a video.
    Generate {
        #[arg(long)]
        topic: String,
        #[arg(long, default_value = "custom")]
        category: Category,
        #[arg(long, default_value = DEFAULT_VOICE_ID)]
        voice: String,
        #[arg(long, default_value = "standard")]
        video_type: VideoType,
        #[arg(long, default_value = "stock")]
        visual_mode: VisualMode,
        #[arg(long, default_value = "cinematic")]
        style: StylePreset,
        /// Follow progress until the job finishes.
        #[arg(long)]
        watch: bool,
    },
    /// Follow in-progress generations until Ctrl-C.
    Watch {
        /// Exit once nothing is generating.
        #[arg(long)]
        exit_when_idle: bool,
    },
    /// Delete a video and its assets.
    Delete { name: String },
    /// Print a video's metadata as JSON.
    Metadata { name: String },
    /// Save a video asset to disk.
    Download {
        kind: DownloadKind,
        name: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Save a short sample of a voice.
    TestVoice {
        voice_id: String,
        #[arg(long, default_value = "standard")]
        video_type: VideoType,
        #[arg(long, default_value = "voice_test.mp3")]
        out: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DownloadKind {
    Video,
    Thumbnail,
    Metadata,
}

impl From<DownloadKind> for AssetKind {
    fn from(kind: DownloadKind) -> Self {
        match kind {
            DownloadKind::Video => AssetKind::Video,
            DownloadKind::Thumbnail => AssetKind::Thumbnail,
            DownloadKind::Metadata => AssetKind::Metadata,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidforge=info,vidforge_dashboard=info".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = DashboardConfig::from_env();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");

    let api = VideoApi::with_timeout(&config.api_url, config.request_timeout)
        .context("Failed to build HTTP client")?;
    let state = Arc::new(AppState::new(
        Arc::new(api),
        NotificationCenter::new(config.notification_ttl),
    ));
    let mut feed = state.notifications().subscribe();

    match cli.command {
        Command::Topics => {
            state.refresh_topics().await;
            let topics = state.topics();
            for category in Category::ALL {
                let list = topics.for_category(category);
                if list.is_empty() {
                    continue;
                }
                println!("{}", category.title());
                for topic in list {
                    let mark = if topic.completed { "x" } else { " " };
                    println!("  [{mark}] {}", topic.title);
                }
            }
        }
        Command::Voices => {
            state.refresh_voices().await;
            for voice in state.voices() {
                println!("{:<24} {:<16} {}", voice.voice_id, voice.name, voice.description);
            }
        }
        Command::Videos => {
            state.refresh_videos().await;
            for video in state.videos() {
                let kind = video.video_type.map(VideoType::title).unwrap_or("-");
                let duration = video.duration_formatted.as_deref().unwrap_or("--:--");
                let status = if video.is_generating() { "generating" } else { "ready" };
                println!(
                    "{:<40} {:<10} {:>8} {:>9.1} MB  {}",
                    video.name, kind, duration, video.size_mb, status
                );
            }
        }
        Command::Usage => {
            state.refresh_usage().await;
            print_usage(&state);
        }
        Command::Generate {
            topic,
            category,
            voice,
            video_type,
            visual_mode,
            style,
            watch,
        } => {
            let options = GenerationOptions {
                category,
                voice_id: voice,
                video_type,
                visual_mode,
                style_preset: style,
            };
            let dispatcher =
                GenerationDispatcher::new(Arc::clone(&state), config.dispatch_refresh_delay);
            let started = dispatcher.start_generation(&topic, &options).await;
            drain(&mut feed);

            let response = started?;
            println!("progress id: {}", response.progress_id);

            if watch {
                state.refresh_videos().await;
                let tracker = Arc::new(ProgressTracker::new(Arc::clone(&state), config.tracker()));
                let gate = IdleGate::awaiting(response.progress_id, JOB_APPEAR_TIMEOUT);
                watch_progress(&state, tracker, &mut feed, config.poll_interval, gate).await?;
            }
        }
        Command::Watch { exit_when_idle } => {
            state.refresh_videos().await;
            let tracker = Arc::new(ProgressTracker::new(Arc::clone(&state), config.tracker()));
            let gate = IdleGate::new(exit_when_idle);
            watch_progress(&state, tracker, &mut feed, config.poll_interval, gate).await?;
        }
        Command::Delete { name } => {
            let result = VideoLibrary::new(Arc::clone(&state)).delete_video(&name).await;
            drain(&mut feed);
            result?;
        }
        Command::Metadata { name } => {
            let result = VideoLibrary::new(Arc::clone(&state)).load_metadata(&name).await;
            drain(&mut feed);
            println!("{}", serde_json::to_string_pretty(&result?)?);
        }
        Command::Download { kind, name, out } => {
            tokio::fs::create_dir_all(&out)
                .await
                .with_context(|| format!("Failed to create {}", out.display()))?;
            let result = Downloader::new(Arc::clone(&state))
                .download(kind.into(), &name, &out)
                .await;
            drain(&mut feed);
            println!("{}", result?.display());
        }
        Command::TestVoice {
            voice_id,
            video_type,
            out,
        } => {
            let result = VideoLibrary::new(Arc::clone(&state))
                .test_voice(&voice_id, video_type)
                .await;
            drain(&mut feed);
            tokio::fs::write(&out, result?)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("{}", out.display());
        }
    }

    Ok(())
}

/// Follow generating videos, printing notifications as they arrive and a
/// progress line per job every `interval`.
///
/// Returns on Ctrl-C or once `gate` reports the session idle. While the
/// gate waits for a submitted job, the video list is refreshed each tick.
async fn watch_progress(
    state: &Arc<AppState>,
    tracker: Arc<ProgressTracker>,
    feed: &mut tokio::sync::broadcast::Receiver<Notification>,
    interval: Duration,
    mut gate: IdleGate,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let follower = {
        let tracker = Arc::clone(&tracker);
        let cancel = cancel.clone();
        tokio::spawn(async move { tracker.follow(cancel).await })
    };

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted");
                break;
            }
            received = feed.recv() => match received {
                Ok(notification) => print_notification(&notification),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification feed lagged");
                }
                Err(RecvError::Closed) => break,
            },
            _ = ticker.tick() => {
                if gate.is_waiting() {
                    state.refresh_videos().await;
                }
                let generating = state.generating_videos();
                for video in &generating {
                    let line = video
                        .progress_id
                        .as_deref()
                        .and_then(|token| tracker.snapshot(token))
                        .map(|p| format!("[{:>3}%] {}", p.percentage, p.step))
                        .unwrap_or_else(|| "[  ?%] Waiting".to_string());
                    println!("{line}  {}", video.display_name);
                }
                if gate.should_exit(&generating) {
                    break;
                }
            }
        }
    }

    cancel.cancel();
    follower.await.context("Progress follower panicked")?;
    drain(feed);
    Ok(())
}

fn print_usage(state: &AppState) {
    let usage = state.usage();
    if let Some(el) = &usage.elevenlabs {
        println!(
            "ElevenLabs: {}/{} characters ({:.1}%), {} remaining, tier {}",
            el.character_count,
            el.character_limit,
            el.percent_used(),
            el.characters_remaining(),
            el.tier
        );
    }
    if let Some(openai) = &usage.openai {
        println!("OpenAI: {} ({})", openai.status, openai.current_month);
        if let Some(note) = &openai.note {
            println!("  {note}");
        }
    }
    if let Some(storage) = &usage.storage {
        println!(
            "Storage: {} videos, {:.2} GB ({} standard, {} shorts)",
            storage.video_count,
            storage.total_size_gb,
            storage.video_type_counts.standard,
            storage.video_type_counts.shorts
        );
    }
}

fn print_notification(notification: &Notification) {
    let tag = match notification.severity {
        Severity::Success => "ok",
        Severity::Error => "error",
        Severity::Info => "info",
    };
    eprintln!("[{tag}] {}", notification.message);
}

/// Print notifications already queued on the feed.
fn drain(feed: &mut tokio::sync::broadcast::Receiver<Notification>) {
    loop {
        match feed.try_recv() {
            Ok(notification) => print_notification(&notification),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}
