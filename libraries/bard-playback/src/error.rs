//! Error types for playback sequencing

use bard_core::{ResolutionError, SessionStateError, StartError};
use thiserror::Error;

/// Errors returned to callers of the queue manager
///
/// These never change queue state; the command layer turns them into direct
/// user feedback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// No voice connection for the guild
    #[error("I'm not in a voice channel")]
    NotConnected,

    /// Skip requested with nothing playing
    #[error("Nothing is playing right now")]
    NotPlaying,

    /// Pause/resume requested in the wrong state
    #[error(transparent)]
    InvalidState(#[from] SessionStateError),

    /// The guild worker is gone (manager shut down)
    #[error("Playback manager is shut down")]
    ManagerClosed,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Why a single queue entry could not be started
///
/// Handled inside the guild worker: reported to the entry's reply target,
/// then the next entry is tried.
#[derive(Debug, Error)]
pub(crate) enum AttemptError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Start(#[from] StartError),
}
