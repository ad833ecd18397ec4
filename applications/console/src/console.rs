//! Console session - runs commands against the playback manager

use crate::{
    commands::{ConsoleCommand, HELP},
    config::BotConfig,
    error::Result,
    render::{render_error, render_now_playing, render_queue},
};
use bard_core::{GuildId, Notifier, ReplyTarget, TrackResolver};
use bard_media::{LocalVoiceConnections, NullSinkSession, TrackLengths};
use bard_playback::{EnqueueOutcome, PlaybackError, PlaybackQueueManager};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Whether the loop keeps reading after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep going, printing the reply if there is one
    Continue(Option<String>),
    Quit,
}

/// One console user acting in one guild
pub struct Console {
    manager: PlaybackQueueManager,
    connections: Arc<LocalVoiceConnections>,
    guild: GuildId,
    reply: ReplyTarget,
    queue_display_limit: usize,
}

impl Console {
    /// Wire the manager to null-sink voice sessions
    ///
    /// `lengths` should be the registry the resolver records into, so
    /// simulated tracks last as long as the real ones.
    pub fn new(
        config: &BotConfig,
        resolver: Arc<dyn TrackResolver>,
        notifier: Arc<dyn Notifier>,
        lengths: Arc<TrackLengths>,
    ) -> Self {
        let fallback = config.playback.fallback_track_length();
        let connections = Arc::new(LocalVoiceConnections::new(move |_guild| {
            Arc::new(NullSinkSession::new(fallback).with_lengths(Arc::clone(&lengths)))
        }));

        let manager = PlaybackQueueManager::with_config(
            resolver,
            connections.clone(),
            notifier,
            config.playback.manager_config(),
        );

        Self {
            manager,
            connections,
            guild: GuildId::new(config.console.guild_id),
            reply: ReplyTarget::new(config.console.reply_target),
            queue_display_limit: config.console.queue_display_limit,
        }
    }

    pub fn manager(&self) -> &PlaybackQueueManager {
        &self.manager
    }

    /// Run one command
    ///
    /// Refusals (nothing playing, not connected) come back as reply text;
    /// only a closed manager is an error.
    pub async fn execute(&self, command: ConsoleCommand) -> Result<Flow> {
        debug!(guild = %self.guild, %command, "Executing console command");

        let reply = match command {
            ConsoleCommand::Play(query) => self.play(query).await?,
            ConsoleCommand::Skip => acknowledge(self.manager.skip(self.guild, self.reply).await)?,
            ConsoleCommand::Stop => acknowledge(self.manager.stop(self.guild, self.reply).await)?,
            ConsoleCommand::Pause => acknowledge(self.manager.pause(self.guild, self.reply).await)?,
            ConsoleCommand::Resume => {
                acknowledge(self.manager.resume(self.guild, self.reply).await)?
            }
            ConsoleCommand::Disconnect => {
                acknowledge(self.manager.disconnect(self.guild, self.reply).await)?
            }
            ConsoleCommand::Queue => {
                let snapshot = self.manager.peek(self.guild).await?;
                Some(render_queue(&snapshot, self.queue_display_limit))
            }
            ConsoleCommand::NowPlaying => {
                let snapshot = self.manager.peek(self.guild).await?;
                Some(render_now_playing(snapshot.current.as_ref()))
            }
            ConsoleCommand::Help => Some(HELP.to_string()),
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        };

        Ok(Flow::Continue(reply))
    }

    async fn play(&self, query: String) -> Result<Option<String>> {
        let mut reply = None;
        if !self.connections.is_connected(self.guild) {
            self.connections.connect(self.guild);
            reply = Some("🔊 Joined voice channel".to_string());
        }

        match self.manager.enqueue(self.guild, query, self.reply).await? {
            EnqueueOutcome::Started => {
                debug!(guild = %self.guild, "Request started immediately");
            }
            EnqueueOutcome::Queued { position } => {
                debug!(guild = %self.guild, position, "Request queued");
            }
        }
        Ok(reply)
    }

    /// Read commands until `quit` or end of input
    ///
    /// Notifications from `events` are written as they arrive, ahead of the
    /// next command.
    pub async fn run<R, W>(
        &self,
        input: R,
        output: &mut W,
        mut events: mpsc::UnboundedReceiver<String>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(guild = %self.guild, "Console ready");
        let mut lines = input.lines();

        loop {
            tokio::select! {
                biased;

                Some(text) = events.recv() => {
                    write_line(output, &text).await?;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };

                    let command = match ConsoleCommand::parse(&line) {
                        Ok(Some(command)) => command,
                        Ok(None) => continue,
                        Err(err) => {
                            write_line(output, &format!("❌ {}", err)).await?;
                            continue;
                        }
                    };

                    match self.execute(command).await? {
                        Flow::Continue(Some(reply)) => write_line(output, &reply).await?,
                        Flow::Continue(None) => {}
                        Flow::Quit => break,
                    }
                }
            }
        }

        // Flush what the last command produced
        while let Ok(text) = events.try_recv() {
            write_line(output, &text).await?;
        }

        self.manager.shutdown();
        info!("Console closed");
        Ok(())
    }
}

/// Acks arrive as events; only refusals need a reply here
fn acknowledge(result: bard_playback::Result<()>) -> Result<Option<String>> {
    match result {
        Ok(()) => Ok(None),
        Err(PlaybackError::ManagerClosed) => Err(PlaybackError::ManagerClosed.into()),
        Err(err) => Ok(Some(render_error(&err))),
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
