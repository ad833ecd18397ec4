//! Guild worker - one task per guild
//!
//! Every operation on a guild, including completions reported by its audio
//! session, arrives as a `GuildCommand` on the worker's channel and is handled
//! to the end before the next one is read. Resolver and session calls are
//! awaited inline, so nothing else touches the guild's state while an attempt
//! is in flight.

use crate::{
    error::{AttemptError, PlaybackError, Result},
    queue::{ActiveTrack, AttemptId, GuildPlaybackState},
    types::{EnqueueOutcome, GuildSnapshot, ManagerConfig},
};
use bard_core::{
    AudioOutputSession, CompletionHandle, GuildId, Notifier, PlaybackEvent, PlaybackFailure,
    QueueEntry, ReplyTarget, ResolutionError, SessionStateError, StartError, Track,
    TrackResolver, VoiceConnections,
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Collaborators shared by every guild worker
pub(crate) struct Services {
    pub resolver: Arc<dyn TrackResolver>,
    pub connections: Arc<dyn VoiceConnections>,
    pub notifier: Arc<dyn Notifier>,
    pub config: ManagerConfig,
}

/// Commands processed by a guild worker
pub(crate) enum GuildCommand {
    /// Queue a request (and start it if idle)
    Enqueue {
        entry: QueueEntry,
        reply: oneshot::Sender<EnqueueOutcome>,
    },

    /// The audio session finished an attempt
    Completed {
        attempt: AttemptId,
        outcome: std::result::Result<(), PlaybackFailure>,
    },

    /// Stop the current track; its completion advances the queue
    Skip {
        target: ReplyTarget,
        reply: oneshot::Sender<Result<()>>,
    },

    /// Stop the current track and discard the queue
    Stop {
        target: ReplyTarget,
        reply: oneshot::Sender<Result<()>>,
    },

    /// Pause the current track
    Pause {
        target: ReplyTarget,
        reply: oneshot::Sender<Result<()>>,
    },

    /// Resume the current track
    Resume {
        target: ReplyTarget,
        reply: oneshot::Sender<Result<()>>,
    },

    /// Clear everything and leave the voice channel
    Disconnect {
        target: ReplyTarget,
        reply: oneshot::Sender<Result<()>>,
    },

    /// Copy the state
    Snapshot { reply: oneshot::Sender<GuildSnapshot> },
}

/// Owns one guild's playback state
pub(crate) struct GuildWorker {
    guild: GuildId,
    state: GuildPlaybackState,
    services: Arc<Services>,
    commands: mpsc::UnboundedReceiver<GuildCommand>,

    /// Used by completion handles to post back onto this worker
    ///
    /// Weak so that the worker exits once the manager drops its sender.
    mailbox: mpsc::WeakUnboundedSender<GuildCommand>,
}

impl GuildWorker {
    /// Spawn a worker task for a guild, returning its command sender
    pub fn spawn(guild: GuildId, services: Arc<Services>) -> mpsc::UnboundedSender<GuildCommand> {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Self {
            guild,
            state: GuildPlaybackState::new(),
            services,
            commands: rx,
            mailbox: tx.downgrade(),
        };
        tokio::spawn(worker.run());
        tx
    }

    async fn run(mut self) {
        debug!(guild = %self.guild, "Guild worker started");

        while let Some(command) = self.commands.recv().await {
            self.handle(command).await;
        }

        // Manager shut down; don't leave a session playing with nobody to advance it
        if let Some(active) = self.state.take_current() {
            if let Some(session) = self.session() {
                debug!(guild = %self.guild, title = %active.track.title, "Stopping session on shutdown");
                session.stop().await;
            }
        }
        debug!(guild = %self.guild, "Guild worker stopped");
    }

    async fn handle(&mut self, command: GuildCommand) {
        match command {
            GuildCommand::Enqueue { entry, reply } => {
                let outcome = self.enqueue(entry).await;
                reply.send(outcome).ok();
            }
            GuildCommand::Completed { attempt, outcome } => {
                self.on_playback_completed(attempt, outcome).await;
            }
            GuildCommand::Skip { target, reply } => {
                reply.send(self.skip(target).await).ok();
            }
            GuildCommand::Stop { target, reply } => {
                reply.send(self.stop(target).await).ok();
            }
            GuildCommand::Pause { target, reply } => {
                reply.send(self.pause(target).await).ok();
            }
            GuildCommand::Resume { target, reply } => {
                reply.send(self.resume(target).await).ok();
            }
            GuildCommand::Disconnect { target, reply } => {
                reply.send(self.disconnect(target).await).ok();
            }
            GuildCommand::Snapshot { reply } => {
                reply.send(self.state.snapshot(self.guild)).ok();
            }
        }
    }

    // ===== Queue Progression =====

    async fn enqueue(&mut self, entry: QueueEntry) -> EnqueueOutcome {
        let target = entry.reply_target;

        if self.state.current().is_none() && self.session().is_none() {
            warn!(guild = %self.guild, query = %entry.raw_query, "Request refused, not connected");
            let message = format!("Error playing \"{}\": {}", entry.raw_query, StartError::NotConnected);
            self.notify(&target, PlaybackEvent::Error { message });
            return EnqueueOutcome::Started;
        }

        let position = self.state.enqueue(entry);

        if self.state.current().is_some() {
            debug!(guild = %self.guild, position, "Request queued behind current track");
            self.notify(&target, PlaybackEvent::Queued { position });
            return EnqueueOutcome::Queued { position };
        }

        self.advance().await;
        EnqueueOutcome::Started
    }

    /// Start the earliest pending entry that can be started
    ///
    /// Each failed entry is reported to its own reply target and consumed,
    /// so the loop ends after at most `pending_len` attempts. Without a voice
    /// session nothing is popped; the queue waits for the next enqueue after
    /// a rejoin.
    async fn advance(&mut self) {
        if self.state.pending_len() > 0 && self.session().is_none() {
            self.state.take_current();
            warn!(guild = %self.guild, held = self.state.pending_len(), "Voice connection lost, holding queue");
            return;
        }

        while let Some(entry) = self.state.pop_next() {
            match self.start_entry(&entry).await {
                Ok(track) => {
                    info!(
                        guild = %self.guild,
                        title = %track.title,
                        remaining = self.state.pending_len(),
                        "Now playing"
                    );
                    self.notify(&entry.reply_target, PlaybackEvent::NowPlaying { track });
                    return;
                }
                Err(err) => {
                    warn!(guild = %self.guild, query = %entry.raw_query, error = %err, "Could not start queue entry");
                    self.notify(
                        &entry.reply_target,
                        PlaybackEvent::Error {
                            message: format!("Error playing \"{}\": {}", entry.raw_query, err),
                        },
                    );
                }
            }
        }

        self.state.take_current();
        debug!(guild = %self.guild, "Queue exhausted, guild idle");
    }

    /// Resolve an entry and hand it to the audio session
    async fn start_entry(&mut self, entry: &QueueEntry) -> std::result::Result<Track, AttemptError> {
        let track = self.resolve(&entry.raw_query).await?;

        let session = self.session().ok_or(StartError::NotConnected)?;
        let attempt = self.state.next_attempt();
        let handle = self.completion_handle(attempt);

        debug!(guild = %self.guild, %attempt, locator = %track.source_locator, "Starting playback");
        session.start(&track.source_locator, handle).await?;

        self.state.set_current(ActiveTrack {
            track: track.clone(),
            reply_target: entry.reply_target,
            attempt,
            paused: false,
        });
        Ok(track)
    }

    async fn resolve(&self, query: &str) -> std::result::Result<Track, ResolutionError> {
        let resolver = &self.services.resolver;
        match self.services.config.resolve_timeout {
            Some(limit) => tokio::time::timeout(limit, resolver.resolve(query))
                .await
                .map_err(|_| ResolutionError::Timeout(limit))?,
            None => resolver.resolve(query).await,
        }
    }

    /// Completion callback that posts back onto this worker
    fn completion_handle(&self, attempt: AttemptId) -> CompletionHandle {
        let mailbox = self.mailbox.clone();
        CompletionHandle::new(move |outcome| {
            if let Some(tx) = mailbox.upgrade() {
                tx.send(GuildCommand::Completed { attempt, outcome }).ok();
            }
        })
    }

    async fn on_playback_completed(
        &mut self,
        attempt: AttemptId,
        outcome: std::result::Result<(), PlaybackFailure>,
    ) {
        if !self.state.is_current_attempt(attempt) {
            debug!(guild = %self.guild, %attempt, "Ignoring completion for an attempt that is no longer current");
            return;
        }

        if let Some(finished) = self.state.take_current() {
            match outcome {
                Ok(()) => {
                    debug!(guild = %self.guild, title = %finished.track.title, "Track finished");
                }
                Err(failure) => {
                    warn!(guild = %self.guild, title = %finished.track.title, error = %failure, "Playback error");
                    self.notify(
                        &finished.reply_target,
                        PlaybackEvent::Error {
                            message: format!("Playback error: {}", failure),
                        },
                    );
                }
            }
        }

        self.advance().await;
    }

    // ===== User Controls =====

    async fn skip(&mut self, target: ReplyTarget) -> Result<()> {
        if self.state.current().is_none() {
            return Err(PlaybackError::NotPlaying);
        }
        let session = self.session().ok_or(PlaybackError::NotConnected)?;

        // The stop completes the attempt; that completion advances the queue
        session.stop().await;
        info!(guild = %self.guild, "Skipped");
        self.notify(&target, PlaybackEvent::Skipped);
        Ok(())
    }

    async fn stop(&mut self, target: ReplyTarget) -> Result<()> {
        let session = self.session().ok_or(PlaybackError::NotConnected)?;

        let (discarded, was_playing) = self.state.clear();
        if was_playing.is_some() {
            session.stop().await;
        }

        info!(guild = %self.guild, discarded, "Stopped and cleared queue");
        self.notify(&target, PlaybackEvent::Stopped);
        Ok(())
    }

    async fn pause(&mut self, target: ReplyTarget) -> Result<()> {
        match self.state.current() {
            None => return Err(SessionStateError::NotPlaying.into()),
            Some(active) if active.paused => return Err(SessionStateError::AlreadyPaused.into()),
            Some(_) => {}
        }
        let session = self.session().ok_or(PlaybackError::NotConnected)?;
        session.pause().await?;

        if let Some(active) = self.state.current_mut() {
            active.paused = true;
        }
        info!(guild = %self.guild, "Paused");
        self.notify(&target, PlaybackEvent::Paused);
        Ok(())
    }

    async fn resume(&mut self, target: ReplyTarget) -> Result<()> {
        match self.state.current() {
            None => return Err(SessionStateError::NotPaused.into()),
            Some(active) if !active.paused => return Err(SessionStateError::NotPaused.into()),
            Some(_) => {}
        }
        let session = self.session().ok_or(PlaybackError::NotConnected)?;
        session.resume().await?;

        if let Some(active) = self.state.current_mut() {
            active.paused = false;
        }
        info!(guild = %self.guild, "Resumed");
        self.notify(&target, PlaybackEvent::Resumed);
        Ok(())
    }

    async fn disconnect(&mut self, target: ReplyTarget) -> Result<()> {
        let session = self.session();
        if session.is_none() && self.state.is_empty() {
            return Err(PlaybackError::NotConnected);
        }

        let (discarded, was_playing) = self.state.clear();
        if let (Some(session), Some(_)) = (&session, &was_playing) {
            session.stop().await;
        }
        self.services.connections.leave(self.guild).await;

        info!(guild = %self.guild, discarded, "Disconnected");
        self.notify(&target, PlaybackEvent::Disconnected);
        Ok(())
    }

    // ===== Helpers =====

    fn session(&self) -> Option<Arc<dyn AudioOutputSession>> {
        self.services.connections.session(self.guild)
    }

    fn notify(&self, target: &ReplyTarget, event: PlaybackEvent) {
        self.services.notifier.notify(self.guild, target, event);
    }
}
