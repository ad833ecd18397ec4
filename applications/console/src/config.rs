//! Console configuration

use crate::error::{ConsoleError, Result};
use bard_media::YtDlpConfig;
use bard_playback::ManagerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "bard.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(default)]
    pub resolver: YtDlpConfig,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_console")]
    pub console: ConsoleSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Give up on a query after this many seconds (no limit when unset)
    #[serde(default)]
    pub resolve_timeout_secs: Option<u64>,

    /// How long the null sink plays a track whose length is unknown
    #[serde(default = "default_fallback_track_secs")]
    pub fallback_track_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleSettings {
    /// Guild the console acts in
    #[serde(default = "default_guild_id")]
    pub guild_id: u64,

    /// Channel replies are addressed to
    #[serde(default = "default_reply_target")]
    pub reply_target: u64,

    /// Pending entries listed by `queue`
    #[serde(default = "default_queue_display_limit")]
    pub queue_display_limit: usize,
}

impl PlaybackSettings {
    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            resolve_timeout: self.resolve_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn fallback_track_length(&self) -> Duration {
        Duration::from_secs(self.fallback_track_secs)
    }
}

impl BotConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit path must exist; the default `bard.toml` is optional.
    /// Variables like `BARD_CONSOLE__GUILD_ID` override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with BARD_)
        settings = settings.add_source(
            config::Environment::with_prefix("BARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.resolver.program.trim().is_empty() {
            return Err(ConsoleError::Config(
                "resolver program is required (set BARD_RESOLVER__PROGRAM)".to_string(),
            ));
        }

        if self.playback.resolve_timeout_secs == Some(0) {
            return Err(ConsoleError::Config(
                "resolve_timeout_secs must be positive".to_string(),
            ));
        }

        if self.playback.fallback_track_secs == 0 {
            return Err(ConsoleError::Config(
                "fallback_track_secs must be positive".to_string(),
            ));
        }

        if self.console.queue_display_limit == 0 {
            return Err(ConsoleError::Config(
                "queue_display_limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        resolve_timeout_secs: None,
        fallback_track_secs: default_fallback_track_secs(),
    }
}

fn default_fallback_track_secs() -> u64 {
    180
}

fn default_console() -> ConsoleSettings {
    ConsoleSettings {
        guild_id: default_guild_id(),
        reply_target: default_reply_target(),
        queue_display_limit: default_queue_display_limit(),
    }
}

fn default_guild_id() -> u64 {
    1
}

fn default_reply_target() -> u64 {
    1
}

fn default_queue_display_limit() -> usize {
    10
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            resolver: YtDlpConfig::default(),
            playback: default_playback(),
            console: default_console(),
        }
    }
}
