//! Data models for the StreamLive admin console

use serde::{Deserialize, Deserializer, Serialize};

/// Title shown when the requested section is not one we know
pub const DEFAULT_TITLE: &str = "Dashboard";

/// Top-level dashboard panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Dashboard,
    Channels,
    Videos,
    Logs,
    Stats,
    Playlists,
    Scheduler,
    Platforms,
    Analytics,
    Users,
}

impl Section {
    pub const ALL: [Section; 10] = [
        Section::Dashboard,
        Section::Channels,
        Section::Videos,
        Section::Logs,
        Section::Stats,
        Section::Playlists,
        Section::Scheduler,
        Section::Platforms,
        Section::Analytics,
        Section::Users,
    ];

    /// Navigation key, as used by `--section` and the saved config
    pub fn key(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Channels => "channels",
            Section::Videos => "videos",
            Section::Logs => "logs",
            Section::Stats => "stats",
            Section::Playlists => "playlists",
            Section::Scheduler => "scheduler",
            Section::Platforms => "platforms",
            Section::Analytics => "analytics",
            Section::Users => "users",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Channels => "Channels Management",
            Section::Videos => "Video Library",
            Section::Logs => "System Logs",
            Section::Stats => "Statistics",
            Section::Playlists => "Video Playlists",
            Section::Scheduler => "Automated Scheduler",
            Section::Platforms => "Multi-Platform Streaming",
            Section::Analytics => "Advanced Analytics",
            Section::Users => "User Management",
        }
    }

    /// Side menu label
    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "📊 Dashboard",
            Section::Channels => "📺 Channels",
            Section::Videos => "🎬 Videos",
            Section::Logs => "📝 Logs",
            Section::Stats => "📈 Statistics",
            Section::Playlists => "🎵 Playlists",
            Section::Scheduler => "⏰ Scheduler",
            Section::Platforms => "📡 Platforms",
            Section::Analytics => "📉 Analytics",
            Section::Users => "👥 Users",
        }
    }

    pub fn from_key(key: &str) -> Option<Section> {
        Section::ALL.iter().copied().find(|s| s.key() == key)
    }
}

/// Treats an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Server records. Every field is optional on the wire; missing values fall
// back to defaults so a partial payload still renders.
// ---------------------------------------------------------------------------

/// Configured stream destination and schedule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub stream_key: String,
    pub rtmp_url: Option<String>,
    pub video_path: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub timezone: Option<String>,
    pub encoding_mode: Option<String>,
    pub bitrate: Option<String>,
    pub fps: Option<i64>,
    pub preset: Option<String>,
    pub enabled: bool,
}

/// Runtime state of one channel as reported by `/status`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelStatus {
    pub id: i64,
    pub running: bool,
    pub video_exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusReport {
    pub channels: Vec<ChannelStatus>,
    pub total_running: i64,
}

impl StatusReport {
    pub fn find(&self, channel_id: i64) -> Option<&ChannelStatus> {
        self.channels.iter().find(|c| c.id == channel_id)
    }
}

/// Video library entry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub filename: String,
    pub file_path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub file_size_mb: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub duration_seconds: i64,
    pub duration_formatted: Option<String>,
    pub resolution: Option<String>,
    pub source: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub usage_count: i64,
}

/// Past streaming session
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Session {
    pub id: i64,
    pub channel_name: Option<String>,
    pub start_time: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub duration_seconds: i64,
    pub duration_formatted: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StreamStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_sessions: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_duration_seconds: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Playlist {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub playback_mode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub video_count: i64,
}

/// Recurring start/stop instruction for a channel
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduledTask {
    pub id: i64,
    pub channel_id: i64,
    pub channel_name: Option<String>,
    pub task_type: String,
    pub scheduled_time: String,
    /// Comma-joined weekday indices, 0 = Monday
    pub days_of_week: String,
    pub enabled: bool,
    pub last_run: Option<String>,
}

/// RTMP fan-out destination attached to a channel
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Platform {
    pub id: i64,
    pub channel_id: i64,
    pub channel_name: Option<String>,
    pub platform_name: String,
    pub rtmp_url: String,
    pub stream_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: i64,
    pub enabled: bool,
}

/// Console account (admin section)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
    pub last_login: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CpuMetrics {
    pub percent: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UsageMetrics {
    pub percent: f64,
    pub used_gb: f64,
    pub total_gb: f64,
}

/// Host load as reported by `/system/metrics`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SystemMetrics {
    pub success: bool,
    pub cpu: CpuMetrics,
    pub memory: UsageMetrics,
    pub disk: UsageMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelAnalytics {
    #[serde(deserialize_with = "null_as_default")]
    pub total_sessions: i64,
    pub success_rate: f64,
    pub uptime_percentage: f64,
    pub average_session_duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PeakHour {
    pub hour: i64,
    pub sessions: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VideoPerformance {
    pub video_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub usage_count: i64,
    pub total_duration: i64,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChannelList {
    pub channels: Vec<Channel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VideoList {
    pub videos: Vec<Video>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VideoDetail {
    pub video: Option<Video>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LogList {
    pub logs: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SessionList {
    pub sessions: Vec<Session>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlaylistList {
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskList {
    pub tasks: Vec<ScheduledTask>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlatformList {
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserList {
    pub users: Vec<User>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PeakHourList {
    pub peak_hours: Vec<PeakHour>,
}

/// Entry for channel pickers (scheduler, platforms, analytics)
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOption {
    pub id: i64,
    pub name: String,
}

impl From<&Channel> for ChannelOption {
    fn from(channel: &Channel) -> Self {
        Self {
            id: channel.id,
            name: channel.name.clone(),
        }
    }
}
