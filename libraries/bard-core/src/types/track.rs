//! Track and queue entry domain types

use crate::types::ReplyTarget;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A resolved, playable unit of audio
///
/// Produced by a `TrackResolver` and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Track title
    pub title: String,

    /// Opaque stream handle understood by the audio output session
    pub source_locator: String,

    /// Track duration in whole seconds, if the source reports one
    pub duration_seconds: Option<u64>,

    /// Thumbnail image URL
    pub thumbnail_url: Option<String>,

    /// Canonical page for the track (for display)
    pub webpage_url: Option<String>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(title: impl Into<String>, source_locator: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source_locator: source_locator.into(),
            duration_seconds: None,
            thumbnail_url: None,
            webpage_url: None,
        }
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration_seconds(mut self, seconds: u64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    /// Set the thumbnail URL
    #[must_use]
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Set the page URL
    #[must_use]
    pub fn with_webpage_url(mut self, url: impl Into<String>) -> Self {
        self.webpage_url = Some(url.into());
        self
    }

    /// Duration as a `Duration`
    pub fn duration(&self) -> Option<Duration> {
        self.duration_seconds.map(Duration::from_secs)
    }

    /// Duration formatted as `m:ss`
    ///
    /// Zero-length durations are treated as unknown (live streams report 0).
    pub fn display_duration(&self) -> Option<String> {
        match self.duration_seconds {
            Some(0) | None => None,
            Some(secs) => Some(format_duration(secs)),
        }
    }
}

/// Format whole seconds as `m:ss`
///
/// Minutes are not wrapped into hours: a 75 minute mix renders as `75:00`.
pub fn format_duration(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// A play request waiting in a guild's queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// The query as typed by the user (URL or search terms)
    pub raw_query: String,

    /// Where status messages for this request go
    pub reply_target: ReplyTarget,
}

impl QueueEntry {
    /// Create a new queue entry
    pub fn new(raw_query: impl Into<String>, reply_target: ReplyTarget) -> Self {
        Self {
            raw_query: raw_query.into(),
            reply_target,
        }
    }
}
