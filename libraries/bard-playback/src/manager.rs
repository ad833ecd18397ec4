//! Playback queue manager - public entry point
//!
//! Owns the guild registry and routes every call to the right guild worker.

use crate::{
    error::{PlaybackError, Result},
    types::{EnqueueOutcome, GuildSnapshot, ManagerConfig},
    worker::{GuildCommand, GuildWorker, Services},
};
use bard_core::{GuildId, Notifier, QueueEntry, ReplyTarget, Track, TrackResolver, VoiceConnections};
use dashmap::DashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Central playback sequencing
///
/// Orchestrates per-guild playback:
/// - One FIFO queue and one now-playing slot per guild
/// - Guilds created lazily on first use, never removed
/// - All operations on a guild serialized through that guild's worker task
/// - Guilds run independently of each other
///
/// Must be created inside a tokio runtime (guild workers are spawned tasks).
pub struct PlaybackQueueManager {
    guilds: DashMap<GuildId, mpsc::UnboundedSender<GuildCommand>>,
    services: Arc<Services>,
    closed: AtomicBool,
}

impl PlaybackQueueManager {
    /// Create new queue manager with default configuration
    pub fn new(
        resolver: Arc<dyn TrackResolver>,
        connections: Arc<dyn VoiceConnections>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_config(resolver, connections, notifier, ManagerConfig::default())
    }

    /// Create new queue manager
    pub fn with_config(
        resolver: Arc<dyn TrackResolver>,
        connections: Arc<dyn VoiceConnections>,
        notifier: Arc<dyn Notifier>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            guilds: DashMap::new(),
            services: Arc::new(Services {
                resolver,
                connections,
                notifier,
                config,
            }),
            closed: AtomicBool::new(false),
        }
    }

    // ===== Queue Operations =====

    /// Queue a play request
    ///
    /// If nothing is playing in the guild, the request is started right away
    /// (resolution and start happen before this returns) and the outcome is
    /// reported through the notifier. Otherwise it waits behind the current
    /// track and its 1-based position is returned.
    ///
    /// Resolution and start failures never surface here.
    pub async fn enqueue(
        &self,
        guild: GuildId,
        raw_query: impl Into<String>,
        reply: ReplyTarget,
    ) -> Result<EnqueueOutcome> {
        let entry = QueueEntry::new(raw_query, reply);
        self.request(guild, |reply| GuildCommand::Enqueue { entry, reply })
            .await
    }

    /// Skip the current track
    ///
    /// Only stops the audio session; the session's completion then advances
    /// to the next entry.
    pub async fn skip(&self, guild: GuildId, reply: ReplyTarget) -> Result<()> {
        self.request(guild, |tx| GuildCommand::Skip { target: reply, reply: tx })
            .await?
    }

    /// Stop playback and discard the queue
    pub async fn stop(&self, guild: GuildId, reply: ReplyTarget) -> Result<()> {
        self.request(guild, |tx| GuildCommand::Stop { target: reply, reply: tx })
            .await?
    }

    /// Pause the current track
    pub async fn pause(&self, guild: GuildId, reply: ReplyTarget) -> Result<()> {
        self.request(guild, |tx| GuildCommand::Pause { target: reply, reply: tx })
            .await?
    }

    /// Resume the paused track
    pub async fn resume(&self, guild: GuildId, reply: ReplyTarget) -> Result<()> {
        self.request(guild, |tx| GuildCommand::Resume { target: reply, reply: tx })
            .await?
    }

    /// Clear the guild's state and leave its voice channel
    pub async fn disconnect(&self, guild: GuildId, reply: ReplyTarget) -> Result<()> {
        self.request(guild, |tx| GuildCommand::Disconnect { target: reply, reply: tx })
            .await?
    }

    // ===== State Queries =====

    /// Copy of the guild's state
    ///
    /// Guilds that were never used report an empty snapshot; no state is
    /// created for them.
    pub async fn peek(&self, guild: GuildId) -> Result<GuildSnapshot> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PlaybackError::ManagerClosed);
        }
        if !self.guilds.contains_key(&guild) {
            return Ok(GuildSnapshot::idle(guild));
        }
        self.request(guild, |reply| GuildCommand::Snapshot { reply })
            .await
    }

    /// The guild's current track
    pub async fn now_playing(&self, guild: GuildId) -> Result<Option<Track>> {
        Ok(self.peek(guild).await?.current.map(|now| now.track))
    }

    /// Number of guilds with state
    pub fn guild_count(&self) -> usize {
        self.guilds.len()
    }

    // ===== Lifecycle =====

    /// Stop all guild workers
    ///
    /// Workers finish the commands already sent, stop any playing session,
    /// and exit. Later calls fail with `ManagerClosed`.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let count = self.guilds.len();
        self.guilds.clear();
        info!(guilds = count, "Playback manager shut down");
    }

    // ===== Helpers =====

    /// Command sender for a guild, spawning its worker on first use
    fn sender(&self, guild: GuildId) -> Result<mpsc::UnboundedSender<GuildCommand>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PlaybackError::ManagerClosed);
        }
        self.register(guild)
    }

    /// Look up or insert the guild's worker
    ///
    /// A `shutdown` that clears the map while a worker is being inserted
    /// leaves the new entry behind, so the flag is checked again afterwards.
    fn register(&self, guild: GuildId) -> Result<mpsc::UnboundedSender<GuildCommand>> {
        let sender = self
            .guilds
            .entry(guild)
            .or_insert_with(|| {
                debug!(guild = %guild, "Creating guild playback state");
                GuildWorker::spawn(guild, Arc::clone(&self.services))
            })
            .clone();

        if self.closed.load(Ordering::SeqCst) {
            self.guilds.remove(&guild);
            return Err(PlaybackError::ManagerClosed);
        }
        Ok(sender)
    }

    /// Send a command and wait for the worker's answer
    async fn request<T>(
        &self,
        guild: GuildId,
        command: impl FnOnce(oneshot::Sender<T>) -> GuildCommand,
    ) -> Result<T> {
        let sender = self.sender(guild)?;
        let (tx, rx) = oneshot::channel();
        sender
            .send(command(tx))
            .map_err(|_| PlaybackError::ManagerClosed)?;
        rx.await.map_err(|_| PlaybackError::ManagerClosed)
    }
}
