//! In-memory voice connection registry
//!
//! Stands in for a voice gateway: "joining" a guild creates an audio session
//! from a factory, "leaving" stops and forgets it.

use async_trait::async_trait;
use bard_core::{AudioOutputSession, GuildId, VoiceConnections};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

type SessionFactory = Box<dyn Fn(GuildId) -> Arc<dyn AudioOutputSession> + Send + Sync>;

/// Voice registry holding one session per joined guild
pub struct LocalVoiceConnections {
    sessions: DashMap<GuildId, Arc<dyn AudioOutputSession>>,
    factory: SessionFactory,
}

impl LocalVoiceConnections {
    /// Create a registry that builds sessions with `factory`
    pub fn new<F, S>(factory: F) -> Self
    where
        F: Fn(GuildId) -> Arc<S> + Send + Sync + 'static,
        S: AudioOutputSession + 'static,
    {
        Self {
            sessions: DashMap::new(),
            factory: Box::new(move |guild| factory(guild) as Arc<dyn AudioOutputSession>),
        }
    }

    /// Join a guild's voice channel, reusing the session if already joined
    pub fn connect(&self, guild: GuildId) -> Arc<dyn AudioOutputSession> {
        self.sessions
            .entry(guild)
            .or_insert_with(|| {
                info!(guild = %guild, "Joined voice channel");
                (self.factory)(guild)
            })
            .clone()
    }

    pub fn is_connected(&self, guild: GuildId) -> bool {
        self.sessions.contains_key(&guild)
    }

    /// Number of guilds with a live session
    pub fn connected_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl VoiceConnections for LocalVoiceConnections {
    fn session(&self, guild: GuildId) -> Option<Arc<dyn AudioOutputSession>> {
        self.sessions.get(&guild).map(|entry| Arc::clone(entry.value()))
    }

    async fn leave(&self, guild: GuildId) {
        if let Some((_, session)) = self.sessions.remove(&guild) {
            session.stop().await;
            info!(guild = %guild, "Left voice channel");
        }
    }
}
