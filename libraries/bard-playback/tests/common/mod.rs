//! Shared test doubles for the playback sequencer
//!
//! In-memory resolver, audio session, voice registry and notifier. The fake
//! session keeps the completion handle of the running attempt so tests decide
//! when a track "ends".

#![allow(dead_code)]

use async_trait::async_trait;
use bard_core::{
    AudioOutputSession, CompletionHandle, GuildId, Notifier, PlaybackEvent, PlaybackFailure,
    ReplyTarget, ResolutionError, SessionStateError, StartError, Track, TrackResolver,
    VoiceConnections,
};
use bard_playback::PlaybackQueueManager;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Resolver =====

/// Resolves every query to a track titled after it
///
/// Queries starting with "bad" fail; queries registered with `hang` never
/// return.
#[derive(Default)]
pub struct FakeResolver {
    calls: Mutex<Vec<String>>,
    hanging: Mutex<HashSet<String>>,
}

impl FakeResolver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn hang(&self, query: &str) {
        self.hanging.lock().unwrap().insert(query.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrackResolver for FakeResolver {
    async fn resolve(&self, query: &str) -> Result<Track, ResolutionError> {
        self.calls.lock().unwrap().push(query.to_string());

        let hangs = self.hanging.lock().unwrap().contains(query);
        if hangs {
            std::future::pending::<()>().await;
        }
        if query.starts_with("bad") {
            return Err(ResolutionError::NotFound(query.to_string()));
        }
        Ok(Track::new(query, locator_for(query)).with_duration_seconds(180))
    }
}

pub fn locator_for(query: &str) -> String {
    format!("stream://{}", query)
}

// ===== Audio Session =====

#[derive(Default)]
struct SessionState {
    handle: Option<CompletionHandle>,
    paused: bool,
    started: Vec<String>,
    stops: usize,
}

/// Audio session whose tracks only end when the test says so
#[derive(Default)]
pub struct FakeSession {
    state: Mutex<SessionState>,
    refuse: Mutex<HashSet<String>>,
}

impl FakeSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `start` fail for a locator
    pub fn refuse(&self, locator: &str) {
        self.refuse.lock().unwrap().insert(locator.to_string());
    }

    /// End the running track normally
    pub fn finish_current(&self) {
        let handle = self.state.lock().unwrap().handle.take();
        handle.expect("no track is playing").finished();
    }

    /// End the running track with an error
    pub fn fail_current(&self, message: &str) {
        let handle = self.state.lock().unwrap().handle.take();
        handle
            .expect("no track is playing")
            .failed(PlaybackFailure::new(message));
    }

    /// Take the running track's handle out, to signal it later
    pub fn take_handle(&self) -> Option<CompletionHandle> {
        self.state.lock().unwrap().handle.take()
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().handle.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    pub fn started(&self) -> Vec<String> {
        self.state.lock().unwrap().started.clone()
    }

    pub fn stops(&self) -> usize {
        self.state.lock().unwrap().stops
    }
}

#[async_trait]
impl AudioOutputSession for FakeSession {
    async fn start(&self, locator: &str, on_complete: CompletionHandle) -> Result<(), StartError> {
        let refused = self.refuse.lock().unwrap().contains(locator);
        if refused {
            on_complete.discard();
            return Err(StartError::Codec(format!("cannot open {}", locator)));
        }
        let mut state = self.state.lock().unwrap();
        assert!(state.handle.is_none(), "start while another track is playing");
        state.started.push(locator.to_string());
        state.handle = Some(on_complete);
        state.paused = false;
        Ok(())
    }

    async fn stop(&self) {
        let handle = {
            let mut state = self.state.lock().unwrap();
            state.stops += 1;
            state.paused = false;
            state.handle.take()
        };
        if let Some(handle) = handle {
            handle.finished();
        }
    }

    async fn pause(&self) -> Result<(), SessionStateError> {
        let mut state = self.state.lock().unwrap();
        if state.handle.is_none() {
            return Err(SessionStateError::NotPlaying);
        }
        if state.paused {
            return Err(SessionStateError::AlreadyPaused);
        }
        state.paused = true;
        Ok(())
    }

    async fn resume(&self) -> Result<(), SessionStateError> {
        let mut state = self.state.lock().unwrap();
        if !state.paused {
            return Err(SessionStateError::NotPaused);
        }
        state.paused = false;
        Ok(())
    }
}

// ===== Voice Connections =====

/// Voice registry backed by a map of fake sessions
#[derive(Default)]
pub struct FakeConnections {
    sessions: Mutex<HashMap<GuildId, Arc<FakeSession>>>,
    left: Mutex<Vec<GuildId>>,
}

impl FakeConnections {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn connect(&self, guild: GuildId) -> Arc<FakeSession> {
        let session = FakeSession::new();
        self.sessions
            .lock()
            .unwrap()
            .insert(guild, Arc::clone(&session));
        session
    }

    pub fn drop_connection(&self, guild: GuildId) {
        self.sessions.lock().unwrap().remove(&guild);
    }

    pub fn left(&self) -> Vec<GuildId> {
        self.left.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoiceConnections for FakeConnections {
    fn session(&self, guild: GuildId) -> Option<Arc<dyn AudioOutputSession>> {
        self.sessions
            .lock()
            .unwrap()
            .get(&guild)
            .map(|s| Arc::clone(s) as Arc<dyn AudioOutputSession>)
    }

    async fn leave(&self, guild: GuildId) {
        self.sessions.lock().unwrap().remove(&guild);
        self.left.lock().unwrap().push(guild);
    }
}

// ===== Notifier =====

/// Records every event in delivery order
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(GuildId, ReplyTarget, PlaybackEvent)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(GuildId, ReplyTarget, PlaybackEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_for(&self, guild: GuildId) -> Vec<PlaybackEvent> {
        self.events()
            .into_iter()
            .filter(|(g, _, _)| *g == guild)
            .map(|(_, _, e)| e)
            .collect()
    }

    /// Titles of NowPlaying events, in order
    pub fn now_playing_titles(&self, guild: GuildId) -> Vec<String> {
        self.events_for(guild)
            .into_iter()
            .filter_map(|e| match e {
                PlaybackEvent::NowPlaying { track } => Some(track.title),
                _ => None,
            })
            .collect()
    }

    pub fn error_count(&self, guild: GuildId) -> usize {
        self.events_for(guild)
            .iter()
            .filter(|e| e.is_error())
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, guild: GuildId, target: &ReplyTarget, event: PlaybackEvent) {
        self.events.lock().unwrap().push((guild, *target, event));
    }
}

// ===== Harness =====

pub struct Harness {
    pub manager: PlaybackQueueManager,
    pub resolver: Arc<FakeResolver>,
    pub connections: Arc<FakeConnections>,
    pub notifier: Arc<RecordingNotifier>,
}

pub const GUILD: GuildId = GuildId::new(100);
pub const CHANNEL: ReplyTarget = ReplyTarget::new(7);

pub fn harness() -> Harness {
    harness_with_timeout(None)
}

pub fn harness_with_timeout(resolve_timeout: Option<Duration>) -> Harness {
    let resolver = FakeResolver::new();
    let connections = FakeConnections::new();
    let notifier = RecordingNotifier::new();
    let manager = PlaybackQueueManager::with_config(
        resolver.clone(),
        connections.clone(),
        notifier.clone(),
        bard_playback::ManagerConfig { resolve_timeout },
    );
    Harness {
        manager,
        resolver,
        connections,
        notifier,
    }
}
