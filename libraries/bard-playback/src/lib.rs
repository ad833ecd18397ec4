//! Bard - Playback Sequencing
//!
//! Per-guild playback sequencing for a voice bot.
//!
//! This crate provides:
//! - One FIFO request queue and one now-playing slot per guild
//! - Immediate start when a request arrives at an idle guild
//! - Completion-driven advance: when the audio session reports a track
//!   finished (or failed), the next request is resolved and started
//! - Automatic continuation past requests that fail to resolve or start
//! - Skip, stop, pause/resume, disconnect, and read-only snapshots
//!
//! # Architecture
//!
//! `bard-playback` only depends on the collaborator traits in `bard-core`:
//! - No dependency on a chat client
//! - No dependency on a media extractor or transcoder
//! - No dependency on a voice library
//!
//! Each guild gets its own worker task that owns the guild's state. Every
//! operation, including completions delivered by the audio session from its
//! own task or thread, is a message to that worker, so operations on one
//! guild never interleave while different guilds run concurrently.
//!
//! # Example
//!
//! ```rust,no_run
//! use bard_core::{GuildId, ReplyTarget};
//! use bard_media::{LocalVoiceConnections, NullSinkSession, TracingNotifier, YtDlpConfig, YtDlpResolver};
//! use bard_playback::{EnqueueOutcome, PlaybackQueueManager};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let connections = Arc::new(LocalVoiceConnections::new(|_guild| {
//!     Arc::new(NullSinkSession::new(Duration::from_secs(180)))
//! }));
//! let manager = PlaybackQueueManager::new(
//!     Arc::new(YtDlpResolver::new(YtDlpConfig::default())),
//!     connections.clone(),
//!     Arc::new(TracingNotifier),
//! );
//!
//! let guild = GuildId::new(1);
//! let channel = ReplyTarget::new(10);
//! connections.connect(guild);
//!
//! // Idle guild: starts immediately
//! let outcome = manager.enqueue(guild, "lofi hip hop", channel).await?;
//! assert_eq!(outcome, EnqueueOutcome::Started);
//!
//! // Busy guild: waits its turn
//! let outcome = manager.enqueue(guild, "synthwave mix", channel).await?;
//! assert_eq!(outcome, EnqueueOutcome::Queued { position: 1 });
//!
//! manager.skip(guild, channel).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod queue;
pub mod types;
mod worker;

// Public exports
pub use error::{PlaybackError, Result};
pub use manager::PlaybackQueueManager;
pub use types::{EnqueueOutcome, GuildSnapshot, ManagerConfig, NowPlaying, PlayerStatus};
