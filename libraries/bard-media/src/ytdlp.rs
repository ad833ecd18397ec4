//! yt-dlp track resolver - wraps the yt-dlp CLI
//!
//! Runs `yt-dlp --dump-single-json` for a query and maps the JSON it prints
//! to a `Track`. Search pages and playlists collapse to their first entry.

use crate::lengths::TrackLengths;
use async_trait::async_trait;
use bard_core::{ResolutionError, Track, TrackResolver};
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

/// yt-dlp invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YtDlpConfig {
    /// Executable name or path
    #[serde(default = "default_program")]
    pub program: String,

    /// Search prefix used for queries that are not URLs
    #[serde(default = "default_search")]
    pub default_search: String,

    /// Extra arguments passed before the query
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_program() -> String {
    "yt-dlp".to_string()
}

fn default_search() -> String {
    "ytsearch".to_string()
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            default_search: default_search(),
            extra_args: Vec::new(),
        }
    }
}

/// Track resolver backed by the yt-dlp executable
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    config: YtDlpConfig,
    lengths: Option<Arc<TrackLengths>>,
}

impl YtDlpResolver {
    pub fn new(config: YtDlpConfig) -> Self {
        Self {
            config,
            lengths: None,
        }
    }

    /// Record the length of every resolved track
    ///
    /// Lets a null-sink session play each track for its real duration.
    pub fn with_lengths(mut self, lengths: Arc<TrackLengths>) -> Self {
        self.lengths = Some(lengths);
        self
    }

    fn command(&self, query: &str) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.arg("--dump-single-json")
            .arg("--no-playlist")
            .arg("--playlist-items")
            .arg("1")
            .arg("--no-warnings")
            .arg("--quiet")
            .arg("--format")
            .arg("bestaudio/best")
            .arg("--default-search")
            .arg(&self.config.default_search)
            .args(&self.config.extra_args)
            .arg("--")
            .arg(query)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl TrackResolver for YtDlpResolver {
    async fn resolve(&self, query: &str) -> Result<Track, ResolutionError> {
        debug!(query, program = %self.config.program, "Resolving with yt-dlp");

        let output = self.command(query).output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResolutionError::other(format!("{} is not installed", self.config.program))
            } else {
                ResolutionError::other(e.to_string())
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(query, &stderr));
        }

        let track = parse_info(query, &output.stdout)?;
        if let Some(lengths) = &self.lengths {
            lengths.record(&track);
        }
        Ok(track)
    }
}

/// Map yt-dlp's JSON output to a track
///
/// # Errors
/// Fails if the output is not JSON, a search returned nothing, or the entry
/// has no stream URL.
pub fn parse_info(query: &str, json: &[u8]) -> Result<Track, ResolutionError> {
    let info: serde_json::Value = serde_json::from_slice(json)
        .map_err(|e| ResolutionError::other(format!("unreadable yt-dlp output: {}", e)))?;

    // Take first item from a playlist or search page
    let info = match info.get("entries") {
        Some(entries) => entries
            .as_array()
            .and_then(|list| list.iter().find(|e| !e.is_null()))
            .ok_or_else(|| ResolutionError::NotFound(query.to_string()))?,
        None => &info,
    };

    let locator = info
        .get("url")
        .and_then(|u| u.as_str())
        .ok_or_else(|| ResolutionError::Unsupported(format!("no stream URL for \"{}\"", query)))?;

    let title = info
        .get("title")
        .and_then(|t| t.as_str())
        .unwrap_or(query);

    let mut track = Track::new(title, locator);

    // yt-dlp reports duration as a float number of seconds
    if let Some(secs) = info.get("duration").and_then(|d| d.as_f64()) {
        if secs.is_finite() && secs > 0.0 {
            track = track.with_duration_seconds(secs.round() as u64);
        }
    }
    if let Some(thumbnail) = info.get("thumbnail").and_then(|t| t.as_str()) {
        track = track.with_thumbnail(thumbnail);
    }
    if let Some(page) = info.get("webpage_url").and_then(|p| p.as_str()) {
        track = track.with_webpage_url(page);
    }

    Ok(track)
}

fn classify_failure(query: &str, stderr: &str) -> ResolutionError {
    let message = stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("yt-dlp exited with an error")
        .trim()
        .trim_start_matches("ERROR: ")
        .to_string();

    if message.contains("Unsupported URL") {
        ResolutionError::Unsupported(message)
    } else if message.contains("Unable to download")
        || message.contains("HTTP Error")
        || message.contains("timed out")
        || message.contains("Connection")
    {
        ResolutionError::Network(message)
    } else if message.contains("No video results") || message.contains("not available") {
        ResolutionError::NotFound(query.to_string())
    } else {
        ResolutionError::Other(message)
    }
}
