//! Bard Core
//!
//! Platform-agnostic core types, collaborator traits, and error handling for Bard.
//!
//! This crate provides the building blocks shared by the playback sequencer
//! and by whatever front end drives it (chat client, console, tests).
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `GuildId`, `ReplyTarget`, `Track`, `QueueEntry`
//! - **Events**: `PlaybackEvent`, the status updates handed to a `Notifier`
//! - **Collaborator Traits**: `TrackResolver`, `AudioOutputSession`,
//!   `VoiceConnections`, `Notifier`
//! - **Error Handling**: `ResolutionError`, `StartError`, `SessionStateError`
//!
//! # Example
//!
//! ```rust
//! use bard_core::{GuildId, QueueEntry, ReplyTarget, Track};
//!
//! let guild = GuildId::new(42);
//! let entry = QueueEntry::new("never gonna give you up", ReplyTarget::new(7));
//!
//! let track = Track::new("Never Gonna Give You Up", "https://cdn.example/stream")
//!     .with_duration_seconds(213);
//!
//! assert_eq!(guild.get(), 42);
//! assert_eq!(entry.raw_query, "never gonna give you up");
//! assert_eq!(track.display_duration().as_deref(), Some("3:33"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{PlaybackFailure, ResolutionError, SessionStateError, StartError};
pub use events::PlaybackEvent;
pub use traits::{AudioOutputSession, CompletionHandle, Notifier, TrackResolver, VoiceConnections};
pub use types::{GuildId, QueueEntry, ReplyTarget, Track};
