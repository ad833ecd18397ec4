//! Console command parsing

use crate::error::{ConsoleError, Result};
use std::fmt;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Queue a URL or search terms
    Play(String),
    Skip,
    Stop,
    Pause,
    Resume,
    Queue,
    NowPlaying,
    Disconnect,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse a line of input
    ///
    /// A leading `/` or `!` is accepted, so `/play x` and `!skip` work like
    /// chat commands. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let line = line
            .strip_prefix('/')
            .or_else(|| line.strip_prefix('!'))
            .unwrap_or(line);
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "play" | "p" => {
                if rest.is_empty() {
                    return Err(ConsoleError::Usage("play <url or search terms>"));
                }
                ConsoleCommand::Play(rest.to_string())
            }
            "skip" | "s" => ConsoleCommand::Skip,
            "stop" => ConsoleCommand::Stop,
            "pause" => ConsoleCommand::Pause,
            "resume" => ConsoleCommand::Resume,
            "queue" | "q" => ConsoleCommand::Queue,
            "nowplaying" | "np" => ConsoleCommand::NowPlaying,
            "disconnect" | "leave" => ConsoleCommand::Disconnect,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => return Err(ConsoleError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

impl fmt::Display for ConsoleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleCommand::Play(query) => write!(f, "play {}", query),
            ConsoleCommand::Skip => write!(f, "skip"),
            ConsoleCommand::Stop => write!(f, "stop"),
            ConsoleCommand::Pause => write!(f, "pause"),
            ConsoleCommand::Resume => write!(f, "resume"),
            ConsoleCommand::Queue => write!(f, "queue"),
            ConsoleCommand::NowPlaying => write!(f, "nowplaying"),
            ConsoleCommand::Disconnect => write!(f, "disconnect"),
            ConsoleCommand::Help => write!(f, "help"),
            ConsoleCommand::Quit => write!(f, "quit"),
        }
    }
}

pub const HELP: &str = "\
Commands:
  play <query>   Play a song from a URL or search terms
  skip           Skip the currently playing song
  stop           Stop the music and clear the queue
  pause          Pause the currently playing song
  resume         Resume the paused song
  queue          Display the current queue
  nowplaying     Display the currently playing song
  disconnect     Disconnect from the voice channel
  help           Show this list
  quit           Exit";
