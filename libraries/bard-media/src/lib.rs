//! Bard - Media Collaborators
//!
//! Concrete implementations of the `bard-core` collaborator traits:
//! - `YtDlpResolver`: resolves queries and URLs through the yt-dlp CLI
//! - `NullSinkSession`: an audio session that keeps time but outputs nothing
//! - `LocalVoiceConnections`: an in-memory guild-to-session registry
//! - `TracingNotifier`: logs playback events
//!
//! `TrackLengths` ties the resolver and the null sink together so simulated
//! tracks last as long as the real ones.

#![forbid(unsafe_code)]

mod connections;
mod lengths;
mod notifier;
mod null_sink;
mod ytdlp;

pub use connections::LocalVoiceConnections;
pub use lengths::TrackLengths;
pub use notifier::TracingNotifier;
pub use null_sink::NullSinkSession;
pub use ytdlp::{parse_info, YtDlpConfig, YtDlpResolver};
