//! Text rendering for playback events and queue views

use bard_core::{GuildId, Notifier, PlaybackEvent, ReplyTarget, Track};
use bard_playback::{GuildSnapshot, NowPlaying, PlaybackError};
use tokio::sync::mpsc;
use tracing::debug;

/// Render a playback event as a console message
pub fn render_event(event: &PlaybackEvent) -> String {
    match event {
        PlaybackEvent::NowPlaying { track } => render_track("🎵 Now Playing", track),
        PlaybackEvent::Queued { position } => {
            format!("✅ Added to queue (Position: {})", position)
        }
        PlaybackEvent::Error { message } => format!("❌ {}", message),
        PlaybackEvent::Stopped => "⏹️ Stopped playing and cleared the queue!".to_string(),
        PlaybackEvent::Skipped => "⏭️ Skipped!".to_string(),
        PlaybackEvent::Paused => "⏸️ Paused!".to_string(),
        PlaybackEvent::Resumed => "▶️ Resumed!".to_string(),
        PlaybackEvent::Disconnected => "👋 Disconnected from voice channel!".to_string(),
    }
}

/// Render a refused user command
pub fn render_error(err: &PlaybackError) -> String {
    format!("❌ {}!", err)
}

/// Render the `nowplaying` view
pub fn render_now_playing(now: Option<&NowPlaying>) -> String {
    match now {
        None => "❌ Nothing is playing right now!".to_string(),
        Some(now) if now.paused => render_track("⏸️ Paused", &now.track),
        Some(now) => render_track("🎵 Now Playing", &now.track),
    }
}

/// Render the `queue` view
///
/// Lists at most `limit` pending entries, then a count of the rest.
pub fn render_queue(snapshot: &GuildSnapshot, limit: usize) -> String {
    if snapshot.pending.is_empty() {
        return match &snapshot.current {
            Some(now) => format!("🎵 Now Playing: **{}**", now.track.title),
            None => "📭 The queue is empty!".to_string(),
        };
    }

    let mut lines = vec!["🎵 Music Queue".to_string()];
    if let Some(now) = &snapshot.current {
        lines.push(format!("Now Playing: **{}**", now.track.title));
    }

    lines.push("Up Next:".to_string());
    for (i, entry) in snapshot.pending.iter().take(limit).enumerate() {
        lines.push(format!("{}. {}", i + 1, entry.raw_query));
    }
    if snapshot.pending.len() > limit {
        lines.push(format!("... and {} more", snapshot.pending.len() - limit));
    }

    lines.join("\n")
}

fn render_track(heading: &str, track: &Track) -> String {
    let mut text = format!("{}: **{}**", heading, track.title);
    if let Some(duration) = track.display_duration() {
        text.push_str(&format!("\n   Duration: {}", duration));
    }
    if let Some(thumbnail) = &track.thumbnail_url {
        text.push_str(&format!("\n   Thumbnail: {}", thumbnail));
    }
    text
}

/// Notifier that renders events and hands them to the console loop
///
/// The loop prints them between commands so output lines never interleave.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    out: mpsc::UnboundedSender<String>,
}

impl ConsoleNotifier {
    /// Create a notifier and the receiver its messages arrive on
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (out, rx) = mpsc::unbounded_channel();
        (Self { out }, rx)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, guild: GuildId, target: &ReplyTarget, event: PlaybackEvent) {
        debug!(guild = %guild, target = %target, event = ?event, "Rendering event");
        // The console may already be gone during shutdown
        self.out.send(render_event(&event)).ok();
    }
}
