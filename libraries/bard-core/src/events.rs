//! Playback Events
//!
//! Status updates emitted by the sequencer and handed to a `Notifier`.
//! Events are emitted at key points:
//! - A track starts (now playing)
//! - A request lands behind the current track (queued)
//! - A request or a playback attempt fails
//! - A user control succeeds (stop, skip, pause, resume, disconnect)

use crate::types::Track;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback sequencer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// A track started playing
    NowPlaying {
        /// The track that started
        track: Track,
    },

    /// A request was queued behind the current track
    Queued {
        /// 1-based position in the pending queue
        position: usize,
    },

    /// A request or playback attempt failed
    Error {
        /// Human-readable description
        message: String,
    },

    /// Playback stopped and the queue was cleared
    Stopped,

    /// The current track was skipped
    Skipped,

    /// Playback paused
    Paused,

    /// Playback resumed
    Resumed,

    /// The voice connection was left and state cleared
    Disconnected,
}

impl PlaybackEvent {
    /// Create an error event from anything displayable
    pub fn error(err: impl std::fmt::Display) -> Self {
        Self::Error {
            message: err.to_string(),
        }
    }

    /// Whether this event reports a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
