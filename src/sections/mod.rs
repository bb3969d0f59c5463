//! Dashboard sections
//!
//! Each section module follows the same shape: `load` performs the GETs
//! (blocking, worker thread), `build` turns the data into a view-model,
//! forms validate operator input into a [`Mutation`], and the panel's
//! `show` paints the view-model and returns what the operator asked for.

pub mod analytics;
pub mod channels;
pub mod dashboard;
pub mod logs;
pub mod platforms;
pub mod playlists;
pub mod scheduler;
pub mod stats;
pub mod users;
pub mod videos;

use std::time::Duration;

use crate::api::ApiResponse;
use crate::controller::{Modal, Notice};
use crate::models::{ChannelOption, Section};
use crate::tasks::{Load, Loaded, Mutation, Origin, UploadJob};

/// A list container: either its fixed placeholder or one entry per item
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<T> {
    Empty(&'static str),
    Items(Vec<T>),
}

impl<T> ListView<T> {
    pub fn new(items: Vec<T>, placeholder: &'static str) -> Self {
        if items.is_empty() {
            ListView::Empty(placeholder)
        } else {
            ListView::Items(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListView::Empty(_) => &[],
            ListView::Items(items) => items,
        }
    }
}

/// Something the operator triggered from a panel
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Mutate(Mutation),
    Confirm { prompt: String, mutation: Mutation },
    Notify(Notice),
    OpenModal(Modal),
    CloseModal(Modal),
    Reload(Section),
    Load(Load),
    SelectVideo(Option<i64>),
    Upload(UploadJob),
    OpenUrl(String),
}

/// Follow-up after a mutation reply
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub notice: Notice,
    pub close: Option<Modal>,
    pub reload: Option<Section>,
    pub reload_delay: Option<Duration>,
}

impl Outcome {
    pub fn notice(notice: Notice) -> Self {
        Self { notice, close: None, reload: None, reload_delay: None }
    }

    pub fn reload(mut self, section: Section) -> Self {
        self.reload = Some(section);
        self
    }

    pub fn close(mut self, modal: Modal) -> Self {
        self.close = Some(modal);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.reload_delay = Some(delay);
        self
    }
}

/// Standard create flow: close and refresh only when the backend agreed
pub(crate) fn create_outcome(response: &ApiResponse, notice: Notice, modal: Modal, section: Section) -> Outcome {
    let outcome = Outcome::notice(notice);
    if response.success {
        outcome.close(modal).reload(section)
    } else {
        outcome
    }
}

/// Server message, or `fallback` when the server sent none
pub(crate) fn message_or(response: &ApiResponse, fallback: &str) -> String {
    if response.message.is_empty() {
        fallback.to_string()
    } else {
        response.message.clone()
    }
}

/// Maps a mutation reply to notice, modal and refresh decisions
pub fn outcome(origin: Origin, response: &ApiResponse) -> Outcome {
    match origin {
        Origin::AddChannel
        | Origin::StartChannel
        | Origin::StopChannel
        | Origin::DeleteChannel
        | Origin::StopAll => channels::outcome(origin, response),
        Origin::DownloadGdrive | Origin::ScanVideos | Origin::DeleteVideo => {
            videos::outcome(origin, response)
        }
        Origin::AddPlaylist | Origin::DeletePlaylist => playlists::outcome(origin, response),
        Origin::AddTask | Origin::DeleteTask => scheduler::outcome(origin, response),
        Origin::AddPlatform | Origin::DeletePlatform => platforms::outcome(origin, response),
        Origin::AddUser | Origin::UpdateUser | Origin::DeleteUser => users::outcome(origin, response),
    }
}

/// Per-section view state owned by the app shell
pub struct Panels {
    pub dashboard: dashboard::DashboardPanel,
    pub channels: channels::ChannelsPanel,
    pub videos: videos::VideosPanel,
    pub logs: logs::LogsPanel,
    pub stats: stats::StatsPanel,
    pub playlists: playlists::PlaylistsPanel,
    pub scheduler: scheduler::SchedulerPanel,
    pub platforms: platforms::PlatformsPanel,
    pub analytics: analytics::AnalyticsPanel,
    pub users: users::UsersPanel,
    pub channel_options: Vec<ChannelOption>,
    pub history_limit: u32,
}

impl Panels {
    pub fn new(history_limit: u32, analytics_days: u32) -> Self {
        Self {
            dashboard: Default::default(),
            channels: Default::default(),
            videos: Default::default(),
            logs: Default::default(),
            stats: Default::default(),
            playlists: Default::default(),
            scheduler: Default::default(),
            platforms: Default::default(),
            analytics: analytics::AnalyticsPanel::new(analytics_days),
            users: Default::default(),
            channel_options: Vec::new(),
            history_limit,
        }
    }

    /// Reads a section needs when it becomes visible or its poller fires
    pub fn loads_for(&self, section: Section) -> Vec<Load> {
        match section {
            Section::Dashboard => vec![Load::Dashboard],
            Section::Channels => vec![Load::Channels],
            Section::Videos => vec![Load::Videos],
            Section::Logs => vec![Load::Logs],
            Section::Stats => vec![Load::Stats { history_limit: self.history_limit }],
            Section::Playlists => vec![Load::Playlists],
            Section::Scheduler => vec![Load::Scheduler],
            Section::Platforms => vec![Load::Platforms],
            // the channel picker is filled alongside the reports
            Section::Analytics => vec![Load::ChannelOptions, Load::Analytics(self.analytics.query())],
            Section::Users => vec![Load::Users],
        }
    }

    /// Stores a fresh result. `selected_video` keeps the library pick stable.
    pub fn apply(&mut self, data: Loaded, selected_video: Option<i64>) {
        match data {
            Loaded::Dashboard(data) => self.dashboard.apply(&data),
            Loaded::Channels(data) => self.channels.apply(&data),
            Loaded::Videos(list) => {
                self.videos.apply(&list);
                self.channels.form.set_video_options(videos::options(&list), selected_video);
            }
            Loaded::Logs(lines) => self.logs.apply(&lines),
            Loaded::Stats(data) => self.stats.apply(&data),
            Loaded::Playlists(list) => self.playlists.apply(&list),
            Loaded::Scheduler(list) => self.scheduler.apply(&list),
            Loaded::Platforms(list) => self.platforms.apply(&list),
            Loaded::Analytics(data) => self.analytics.apply(&data),
            Loaded::Users(list) => self.users.apply(&list),
            Loaded::ChannelOptions(options) => self.channel_options = options,
            Loaded::VideoDetail(video) => {
                // a detail for a video that is no longer picked is ignored
                if let Some(video) = video {
                    if selected_video == Some(video.id) {
                        self.channels.form.video_path = video.file_path;
                    }
                }
            }
        }
    }

    /// A closed modal discards whatever was typed into it
    pub fn reset_form(&mut self, modal: Modal) {
        match modal {
            Modal::AddChannel => self.channels.form.reset(),
            Modal::UploadVideo => self.videos.reset_upload(),
            Modal::DownloadVideo => self.videos.download = Default::default(),
            Modal::AddPlaylist => self.playlists.form = Default::default(),
            Modal::AddTask => self.scheduler.form = Default::default(),
            Modal::AddPlatform => self.platforms.form = Default::default(),
            Modal::AddUser => self.users.new_form = Default::default(),
            Modal::EditUser => self.users.edit_form = Default::default(),
            Modal::Settings => {}
        }
    }
}
