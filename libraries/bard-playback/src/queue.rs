//! Per-guild playback state
//!
//! Structure:
//! ```text
//! Currently Playing: Track A   (attempt 7, reply -> #general)
//! ─────────────────────────────
//! Pending (FIFO):
//!   - "track b"   (reply -> #general)
//!   - "track c"   (reply -> #music)
//! ```
//!
//! Passive record. Only the guild worker touches it.

use crate::types::{GuildSnapshot, NowPlaying};
use bard_core::{GuildId, QueueEntry, ReplyTarget, Track};
use std::collections::VecDeque;

/// Identifies one playback attempt within a guild
///
/// Completions carry the attempt they belong to, so a completion from a
/// track that was stopped or replaced can be told apart from the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct AttemptId(u64);

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The track the guild's audio session is playing
#[derive(Debug, Clone)]
pub(crate) struct ActiveTrack {
    pub track: Track,
    pub reply_target: ReplyTarget,
    pub attempt: AttemptId,
    pub paused: bool,
}

/// Pending queue plus the now-playing slot for one guild
#[derive(Debug, Default)]
pub(crate) struct GuildPlaybackState {
    /// Requests waiting to play, earliest first
    pending: VecDeque<QueueEntry>,

    /// Currently playing track
    current: Option<ActiveTrack>,

    /// Counter for attempt ids (never reused within a guild)
    attempts: u64,
}

impl GuildPlaybackState {
    /// Create new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; returns its 1-based position
    pub fn enqueue(&mut self, entry: QueueEntry) -> usize {
        self.pending.push_back(entry);
        self.pending.len()
    }

    /// Remove and return the earliest entry
    pub fn pop_next(&mut self) -> Option<QueueEntry> {
        self.pending.pop_front()
    }

    /// Allocate a fresh attempt id
    pub fn next_attempt(&mut self) -> AttemptId {
        self.attempts += 1;
        AttemptId(self.attempts)
    }

    pub fn current(&self) -> Option<&ActiveTrack> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut ActiveTrack> {
        self.current.as_mut()
    }

    pub fn set_current(&mut self, active: ActiveTrack) {
        self.current = Some(active);
    }

    pub fn take_current(&mut self) -> Option<ActiveTrack> {
        self.current.take()
    }

    /// Whether `attempt` is the one currently playing
    pub fn is_current_attempt(&self, attempt: AttemptId) -> bool {
        self.current.as_ref().is_some_and(|a| a.attempt == attempt)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Empty both fields
    ///
    /// Returns the number of discarded pending entries and the track that
    /// was playing, if any.
    pub fn clear(&mut self) -> (usize, Option<ActiveTrack>) {
        let discarded = self.pending.len();
        self.pending.clear();
        (discarded, self.current.take())
    }

    /// Whether nothing is playing and nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    /// Copy the state for display
    pub fn snapshot(&self, guild: GuildId) -> GuildSnapshot {
        GuildSnapshot {
            guild,
            current: self.current.as_ref().map(|active| NowPlaying {
                track: active.track.clone(),
                reply_target: active.reply_target,
                paused: active.paused,
            }),
            pending: self.pending.iter().cloned().collect(),
        }
    }
}
