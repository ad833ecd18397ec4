//! ID types for Bard entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Guild identifier
///
/// A guild is an isolated chat community; all playback state is scoped to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(u64);

impl GuildId {
    /// Create a new guild ID
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw snowflake value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for GuildId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where status messages for a request should be sent
///
/// Opaque to the sequencer. Front ends map it to a text channel, a terminal,
/// or a test recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyTarget(u64);

impl ReplyTarget {
    /// Create a new reply target
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw channel value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReplyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
