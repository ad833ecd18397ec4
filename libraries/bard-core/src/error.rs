//! Collaborator error types for Bard

use std::time::Duration;
use thiserror::Error;

/// A query could not be turned into a playable track
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Nothing matched the query
    #[error("No results for \"{0}\"")]
    NotFound(String),

    /// The resolver could not reach the media source
    #[error("Network error: {0}")]
    Network(String),

    /// The source exists but cannot be streamed
    #[error("Unsupported source: {0}")]
    Unsupported(String),

    /// The resolver did not answer in time
    #[error("Timed out after {0:?} resolving query")]
    Timeout(Duration),

    /// Anything else the resolver reported
    #[error("Error extracting info: {0}")]
    Other(String),
}

impl ResolutionError {
    /// Create an "other" error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// The playback engine refused to start a track
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    /// No voice connection for the guild
    #[error("Not connected to a voice channel")]
    NotConnected,

    /// The stream could not be opened or decoded
    #[error("Error creating audio source: {0}")]
    Codec(String),

    /// Anything else the engine reported
    #[error("Playback engine error: {0}")]
    Other(String),
}

/// Pause/resume requested in a state that does not support it
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStateError {
    /// Nothing is playing
    #[error("Nothing is playing right now")]
    NotPlaying,

    /// Already paused
    #[error("Playback is already paused")]
    AlreadyPaused,

    /// Not paused
    #[error("Nothing is paused right now")]
    NotPaused,
}

/// A playback attempt that ended abnormally
///
/// Reported through a `CompletionHandle` after a successful start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlaybackFailure(pub String);

impl PlaybackFailure {
    /// Create a new playback failure
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
