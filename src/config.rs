//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Refresh periods for the sections that poll while visible
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollIntervals {
    #[serde(default = "default_fast_poll")]
    pub stats_secs: u64,
    #[serde(default = "default_fast_poll")]
    pub channels_secs: u64,
    #[serde(default = "default_videos_poll")]
    pub videos_secs: u64,
    #[serde(default = "default_fast_poll")]
    pub logs_secs: u64,
}

fn default_fast_poll() -> u64 { 10 }
fn default_videos_poll() -> u64 { 30 }

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            stats_secs: 10,
            channels_secs: 10,
            videos_secs: 30,
            logs_secs: 10,
        }
    }
}

impl PollIntervals {
    /// Zero would spin the poller every frame
    fn secs(value: u64) -> Duration {
        Duration::from_secs(value.max(1))
    }

    pub fn stats(&self) -> Duration { Self::secs(self.stats_secs) }
    pub fn channels(&self) -> Duration { Self::secs(self.channels_secs) }
    pub fn videos(&self) -> Duration { Self::secs(self.videos_secs) }
    pub fn logs(&self) -> Duration { Self::secs(self.logs_secs) }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_server")]
    pub server_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub poll: PollIntervals,
    #[serde(default = "default_section")]
    pub start_section: String,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
    #[serde(default = "default_analytics_days")]
    pub analytics_days: u32,
}

fn default_server() -> String { "http://localhost:5000".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_section() -> String { "dashboard".to_string() }
fn default_true() -> bool { true }
fn default_font_size() -> u32 { 12 }
fn default_history_limit() -> u32 { 5 }
fn default_analytics_days() -> u32 { 30 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server(),
            request_timeout_secs: 30,
            poll: PollIntervals::default(),
            start_section: default_section(),
            dark_mode: true,
            font_size: 12,
            history_limit: 5,
            analytics_days: 30,
        }
    }
}

impl AppConfig {
    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("streamlive_admin");
        fs::create_dir_all(&path).ok();
        path.push("config.json");
        path
    }

    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Missing or unreadable files fall back to defaults
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Ignoring malformed config {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("Cannot read config {}: {}", path.display(), e),
            }
        }

        Self::default()
    }

    pub fn save(&self) {
        self.save_to(&Self::config_path());
    }

    pub fn save_to(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    log::warn!("Failed to save config {}: {}", path.display(), e);
                }
            }
            Err(e) => log::warn!("Failed to serialize config: {}", e),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
