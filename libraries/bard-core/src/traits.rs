//! Collaborator traits for Bard
//!
//! The sequencer only talks to the outside world through these. Concrete
//! implementations live in front ends (`bard-media`, test fakes).

use crate::error::{PlaybackFailure, ResolutionError, SessionStateError, StartError};
use crate::events::PlaybackEvent;
use crate::types::{GuildId, ReplyTarget, Track};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Track resolver trait
///
/// Turns a free-form query (URL or search terms) into a playable `Track`.
/// May be slow; must be safe to call repeatedly with different queries.
///
/// When the source yields several items (a playlist or a search page), only
/// the first one is returned.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolve a query to a track
    ///
    /// # Errors
    /// Returns an error if nothing matches or the source cannot be streamed
    async fn resolve(&self, query: &str) -> Result<Track, ResolutionError>;
}

/// Audio output session trait
///
/// The per-guild live playback engine. Implementers must invoke the
/// `CompletionHandle` passed to `start` exactly once per successful start,
/// never before `start` returns, including when the track is stopped early.
#[async_trait]
pub trait AudioOutputSession: Send + Sync {
    /// Begin playback of a stream locator
    ///
    /// # Errors
    /// Returns an error if the engine cannot start. The handle should then be
    /// discarded; callers ignore completions for attempts that never started.
    async fn start(&self, locator: &str, on_complete: CompletionHandle) -> Result<(), StartError>;

    /// Stop the current track (completes its handle without error)
    async fn stop(&self);

    /// Pause playback
    async fn pause(&self) -> Result<(), SessionStateError>;

    /// Resume playback
    async fn resume(&self) -> Result<(), SessionStateError>;
}

/// Voice connection registry trait
///
/// Maps a guild to the audio session of its voice connection. Joining a
/// channel is the front end's concern; the sequencer only looks sessions up
/// and asks to leave.
#[async_trait]
pub trait VoiceConnections: Send + Sync {
    /// Get the audio session for a guild, if connected
    fn session(&self, guild: GuildId) -> Option<Arc<dyn AudioOutputSession>>;

    /// Leave the guild's voice channel
    async fn leave(&self, guild: GuildId);
}

/// Notifier trait
///
/// Receives status events and renders them. Fire-and-forget: the sequencer
/// never waits on or inspects the outcome.
pub trait Notifier: Send + Sync {
    /// Deliver an event for a guild to a reply target
    fn notify(&self, guild: GuildId, target: &ReplyTarget, event: PlaybackEvent);
}

type CompletionFn = Box<dyn FnOnce(Result<(), PlaybackFailure>) + Send + 'static>;

/// One-shot completion signal for a playback attempt
///
/// Handed to `AudioOutputSession::start`. Signalling consumes the handle, so
/// it can fire at most once. A handle dropped without being signalled reports
/// a failure, so a session that loses track of it cannot stall the queue.
pub struct CompletionHandle {
    callback: Option<CompletionFn>,
}

impl CompletionHandle {
    /// Wrap a callback that runs when the attempt ends
    pub fn new(callback: impl FnOnce(Result<(), PlaybackFailure>) + Send + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// Report the outcome of the attempt
    pub fn complete(mut self, outcome: Result<(), PlaybackFailure>) {
        if let Some(callback) = self.callback.take() {
            callback(outcome);
        }
    }

    /// Report that the track ended normally (or was stopped)
    pub fn finished(self) {
        self.complete(Ok(()));
    }

    /// Report that playback failed
    pub fn failed(self, failure: PlaybackFailure) {
        self.complete(Err(failure));
    }

    /// Drop the handle without signalling anything
    ///
    /// Used when `start` fails: the attempt never began, so there is nothing
    /// to complete.
    pub fn discard(mut self) {
        self.callback = None;
    }
}

impl Drop for CompletionHandle {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback(Err(PlaybackFailure::new(
                "playback session ended without reporting completion",
            )));
        }
    }
}

impl fmt::Debug for CompletionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionHandle")
            .field("armed", &self.callback.is_some())
            .finish()
    }
}
