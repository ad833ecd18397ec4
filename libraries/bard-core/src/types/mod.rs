//! Domain types

mod ids;
mod track;

pub use ids::{GuildId, ReplyTarget};
pub use track::{format_duration, QueueEntry, Track};
