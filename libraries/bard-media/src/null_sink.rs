//! Null-sink audio session
//!
//! Plays nothing, but keeps time like a real output: a track "plays" for its
//! recorded length (or a fallback), pausing freezes the clock, and the
//! completion handle fires exactly once when the clock runs out or the track
//! is stopped. Useful for running the sequencer without a voice stack.

use crate::lengths::TrackLengths;
use async_trait::async_trait;
use bard_core::{AudioOutputSession, CompletionHandle, SessionStateError, StartError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Audio output session that discards audio and simulates playback time
pub struct NullSinkSession {
    /// Length used when the locator has no recorded duration
    fallback: Duration,
    lengths: Option<Arc<TrackLengths>>,
    inner: Arc<Mutex<SinkState>>,
}

#[derive(Default)]
struct SinkState {
    /// Bumped on every start, pause, resume and stop; stale timers compare
    /// against it and give up
    generation: u64,
    playing: Option<Playing>,
}

struct Playing {
    locator: String,
    handle: CompletionHandle,
    remaining: Duration,
    resumed_at: Instant,
    paused: bool,
    timer: Option<JoinHandle<()>>,
}

impl Playing {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl NullSinkSession {
    pub fn new(fallback: Duration) -> Self {
        Self {
            fallback,
            lengths: None,
            inner: Arc::new(Mutex::new(SinkState::default())),
        }
    }

    /// Look track lengths up in a shared registry
    pub fn with_lengths(mut self, lengths: Arc<TrackLengths>) -> Self {
        self.lengths = Some(lengths);
        self
    }

    /// Locator of the track being played, if any
    pub async fn current_locator(&self) -> Option<String> {
        let state = self.inner.lock().await;
        state.playing.as_ref().map(|p| p.locator.clone())
    }

    pub async fn is_paused(&self) -> bool {
        let state = self.inner.lock().await;
        state.playing.as_ref().is_some_and(|p| p.paused)
    }

    /// Time left on the current track
    pub async fn remaining(&self) -> Option<Duration> {
        let state = self.inner.lock().await;
        state.playing.as_ref().map(|p| {
            if p.paused {
                p.remaining
            } else {
                p.remaining.saturating_sub(p.resumed_at.elapsed())
            }
        })
    }

    fn track_length(&self, locator: &str) -> Duration {
        self.lengths
            .as_ref()
            .and_then(|lengths| lengths.get(locator))
            .unwrap_or(self.fallback)
    }

    /// Finish the track after `after`, unless the generation moved on
    fn spawn_timer(&self, generation: u64, after: Duration) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(after).await;

            let finished = {
                let mut state = inner.lock().await;
                if state.generation != generation {
                    return;
                }
                state.playing.take()
            };

            if let Some(playing) = finished {
                debug!(locator = %playing.locator, "Null sink reached end of track");
                playing.handle.finished();
            }
        })
    }
}

#[async_trait]
impl AudioOutputSession for NullSinkSession {
    async fn start(&self, locator: &str, on_complete: CompletionHandle) -> Result<(), StartError> {
        if locator.trim().is_empty() {
            on_complete.discard();
            return Err(StartError::Codec("empty stream locator".to_string()));
        }

        let length = self.track_length(locator);
        let interrupted = {
            let mut state = self.inner.lock().await;
            let interrupted = state.playing.take().map(|mut previous| {
                previous.cancel_timer();
                previous
            });

            state.generation += 1;
            let timer = self.spawn_timer(state.generation, length);
            state.playing = Some(Playing {
                locator: locator.to_string(),
                handle: on_complete,
                remaining: length,
                resumed_at: Instant::now(),
                paused: false,
                timer: Some(timer),
            });
            interrupted
        };

        if let Some(previous) = interrupted {
            debug!(locator = %previous.locator, "Null sink interrupted by a new track");
            previous.handle.finished();
        }

        trace!(locator, length_secs = length.as_secs(), "Null sink started");
        Ok(())
    }

    async fn stop(&self) {
        let stopped = {
            let mut state = self.inner.lock().await;
            state.generation += 1;
            state.playing.take()
        };

        if let Some(mut playing) = stopped {
            playing.cancel_timer();
            debug!(locator = %playing.locator, "Null sink stopped");
            playing.handle.finished();
        }
    }

    async fn pause(&self) -> Result<(), SessionStateError> {
        let mut state = self.inner.lock().await;
        state.generation += 1;

        let playing = state
            .playing
            .as_mut()
            .ok_or(SessionStateError::NotPlaying)?;
        if playing.paused {
            return Err(SessionStateError::AlreadyPaused);
        }

        playing.cancel_timer();
        playing.remaining = playing.remaining.saturating_sub(playing.resumed_at.elapsed());
        playing.paused = true;
        Ok(())
    }

    async fn resume(&self) -> Result<(), SessionStateError> {
        let mut state = self.inner.lock().await;

        let remaining = match state.playing.as_ref() {
            Some(playing) if playing.paused => playing.remaining,
            _ => return Err(SessionStateError::NotPaused),
        };

        state.generation += 1;
        let timer = self.spawn_timer(state.generation, remaining);
        if let Some(playing) = state.playing.as_mut() {
            playing.timer = Some(timer);
            playing.resumed_at = Instant::now();
            playing.paused = false;
        }
        Ok(())
    }
}
