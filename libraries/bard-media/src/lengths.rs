//! Track length registry
//!
//! Sessions only receive a stream locator. Resolvers record each track's
//! duration here so a session can look it up by locator.

use bard_core::Track;
use dashmap::DashMap;
use std::time::Duration;

/// Known durations keyed by stream locator
#[derive(Debug, Default)]
pub struct TrackLengths {
    by_locator: DashMap<String, Duration>,
}

impl TrackLengths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a track's duration, if it has one
    pub fn record(&self, track: &Track) {
        if let Some(duration) = track.duration().filter(|d| !d.is_zero()) {
            self.by_locator
                .insert(track.source_locator.clone(), duration);
        }
    }

    /// Duration recorded for a locator
    pub fn get(&self, locator: &str) -> Option<Duration> {
        self.by_locator.get(locator).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.by_locator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_locator.is_empty()
    }
}
