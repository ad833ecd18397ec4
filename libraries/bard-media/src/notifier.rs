//! Notifier that writes every event to the tracing log

use bard_core::{GuildId, Notifier, PlaybackEvent, ReplyTarget};
use tracing::{info, warn};

/// Logs playback events instead of sending them anywhere
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, guild: GuildId, target: &ReplyTarget, event: PlaybackEvent) {
        match event {
            PlaybackEvent::NowPlaying { track } => {
                info!(
                    guild = %guild,
                    target = %target,
                    title = %track.title,
                    duration = track.display_duration().as_deref().unwrap_or("?"),
                    "Now playing"
                );
            }
            PlaybackEvent::Error { message } => {
                warn!(guild = %guild, target = %target, %message, "Playback error");
            }
            other => {
                info!(guild = %guild, target = %target, event = ?other, "Playback event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bard_core::Track;

    #[test]
    fn test_notify_accepts_every_event() {
        let notifier = TracingNotifier;
        let guild = GuildId::new(1);
        let target = ReplyTarget::new(2);

        notifier.notify(
            guild,
            &target,
            PlaybackEvent::NowPlaying {
                track: Track::new("Song", "stream://song"),
            },
        );
        notifier.notify(guild, &target, PlaybackEvent::error("boom"));
        notifier.notify(guild, &target, PlaybackEvent::Disconnected);
    }
}
