//! Bard Console - line-oriented front end for the playback sequencer
//!
//! Reads chat-style commands (`play`, `skip`, `queue`, ...) from a stream,
//! runs them against a `PlaybackQueueManager` and prints replies and
//! playback events. Voice output goes to null-sink sessions.

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod render;

pub use commands::ConsoleCommand;
pub use config::BotConfig;
pub use console::{Console, Flow};
pub use error::{ConsoleError, Result};
pub use render::ConsoleNotifier;
