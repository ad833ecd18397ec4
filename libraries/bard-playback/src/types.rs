//! Public types for playback sequencing

use bard_core::{GuildId, QueueEntry, ReplyTarget, Track};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Player status for a guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// Nothing playing
    Idle,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Result of an enqueue request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnqueueOutcome {
    /// The guild was idle; the queue was advanced immediately
    ///
    /// The outcome of the attempt (now playing or error) went to the
    /// notifier.
    Started,

    /// The request waits behind the current track
    Queued {
        /// 1-based position in the pending queue
        position: usize,
    },
}

/// The track currently owned by a guild's audio session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// The resolved track
    pub track: Track,

    /// Where the request that produced it wants status messages
    pub reply_target: ReplyTarget,

    /// Whether the track is paused
    pub paused: bool,
}

/// Read-only copy of a guild's playback state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSnapshot {
    /// Guild the snapshot was taken for
    pub guild: GuildId,

    /// Currently playing track
    pub current: Option<NowPlaying>,

    /// Requests waiting to play, in play order
    pub pending: Vec<QueueEntry>,
}

impl GuildSnapshot {
    /// Snapshot of a guild with no state
    pub fn idle(guild: GuildId) -> Self {
        Self {
            guild,
            current: None,
            pending: Vec::new(),
        }
    }

    /// Derived player status
    pub fn status(&self) -> PlayerStatus {
        match &self.current {
            None => PlayerStatus::Idle,
            Some(now) if now.paused => PlayerStatus::Paused,
            Some(_) => PlayerStatus::Playing,
        }
    }

    /// Whether nothing is playing and nothing is waiting
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    /// Queries of the pending entries, in play order
    pub fn pending_queries(&self) -> Vec<&str> {
        self.pending.iter().map(|e| e.raw_query.as_str()).collect()
    }
}

/// Configuration for the queue manager
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Give up on a resolver call after this long (default: wait forever)
    ///
    /// A hung resolver otherwise stalls the guild's queue.
    pub resolve_timeout: Option<Duration>,
}
