//! Background request execution
//!
//! Every command runs on its own thread and reports back over an mpsc
//! channel that the UI drains once per frame.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Duration;

use serde_json::Value;

use crate::api::{ApiClient, ApiResponse, Method};
use crate::models::{ChannelList, ChannelOption, Playlist, Platform, ScheduledTask, User, Video, VideoDetail};
use crate::sections::analytics::{AnalyticsData, AnalyticsQuery};
use crate::sections::channels::ChannelsData;
use crate::sections::dashboard::DashboardData;
use crate::sections::stats::StatsData;
use crate::sections::{analytics, channels, dashboard, logs, platforms, playlists, scheduler, stats, users, videos};

/// Independently refreshed display region; each has its own request sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
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
    ChannelOptions,
    VideoDetail,
}

/// A read the UI wants performed
#[derive(Debug, Clone, PartialEq)]
pub enum Load {
    Dashboard,
    Channels,
    Videos,
    Logs,
    Stats { history_limit: u32 },
    Playlists,
    Scheduler,
    Platforms,
    Analytics(AnalyticsQuery),
    Users,
    ChannelOptions,
    VideoDetail(i64),
}

impl Load {
    pub fn container(&self) -> Container {
        match self {
            Load::Dashboard => Container::Dashboard,
            Load::Channels => Container::Channels,
            Load::Videos => Container::Videos,
            Load::Logs => Container::Logs,
            Load::Stats { .. } => Container::Stats,
            Load::Playlists => Container::Playlists,
            Load::Scheduler => Container::Scheduler,
            Load::Platforms => Container::Platforms,
            Load::Analytics(_) => Container::Analytics,
            Load::Users => Container::Users,
            Load::ChannelOptions => Container::ChannelOptions,
            Load::VideoDetail(_) => Container::VideoDetail,
        }
    }
}

/// Result of a [`Load`]
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Dashboard(DashboardData),
    Channels(ChannelsData),
    Videos(Vec<Video>),
    Logs(Vec<String>),
    Stats(StatsData),
    Playlists(Vec<Playlist>),
    Scheduler(Vec<ScheduledTask>),
    Platforms(Vec<Platform>),
    Analytics(AnalyticsData),
    Users(Vec<User>),
    ChannelOptions(Vec<ChannelOption>),
    VideoDetail(Option<Video>),
}

/// Performs the GETs behind a load. Blocking; call from a worker thread.
pub fn fetch(api: &ApiClient, load: &Load) -> Loaded {
    match load {
        Load::Dashboard => Loaded::Dashboard(dashboard::load(api)),
        Load::Channels => Loaded::Channels(channels::load(api)),
        Load::Videos => Loaded::Videos(videos::load(api)),
        Load::Logs => Loaded::Logs(logs::load(api)),
        Load::Stats { history_limit } => Loaded::Stats(stats::load(api, *history_limit)),
        Load::Playlists => Loaded::Playlists(playlists::load(api)),
        Load::Scheduler => Loaded::Scheduler(scheduler::load(api)),
        Load::Platforms => Loaded::Platforms(platforms::load(api)),
        Load::Analytics(query) => Loaded::Analytics(analytics::load(api, query)),
        Load::Users => Loaded::Users(users::load(api)),
        Load::ChannelOptions => {
            let list: ChannelList = api.get_as("/channels");
            Loaded::ChannelOptions(list.channels.iter().map(ChannelOption::from).collect())
        }
        Load::VideoDetail(id) => {
            let detail: VideoDetail = api.get_as(&format!("/videos/{}", id));
            Loaded::VideoDetail(detail.video)
        }
    }
}

/// Which operator action a mutation came from; decides the follow-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    AddChannel,
    StartChannel,
    StopChannel,
    DeleteChannel,
    StopAll,
    DownloadGdrive,
    ScanVideos,
    DeleteVideo,
    AddPlaylist,
    DeletePlaylist,
    AddTask,
    DeleteTask,
    AddPlatform,
    DeletePlatform,
    AddUser,
    UpdateUser,
    DeleteUser,
}

/// A write request ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub origin: Origin,
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl Mutation {
    pub fn post(origin: Origin, path: impl Into<String>, body: Value) -> Self {
        Self { origin, method: Method::Post, path: path.into(), body: Some(body) }
    }

    pub fn put(origin: Origin, path: impl Into<String>, body: Value) -> Self {
        Self { origin, method: Method::Put, path: path.into(), body: Some(body) }
    }

    pub fn delete(origin: Origin, path: impl Into<String>) -> Self {
        Self { origin, method: Method::Delete, path: path.into(), body: None }
    }

    pub fn execute(&self, api: &ApiClient) -> ApiResponse {
        let empty = Value::Object(Default::default());
        let body = self.body.as_ref().unwrap_or(&empty);
        let raw = match self.method {
            Method::Get => api.get(&self.path),
            Method::Post => api.post(&self.path, body),
            Method::Put => api.put(&self.path, body),
            Method::Delete => api.delete(&self.path),
        };
        ApiResponse::from_value(raw)
    }
}

/// Validated upload form
#[derive(Debug, Clone, PartialEq)]
pub struct UploadJob {
    pub title: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Background task messages
#[derive(Debug)]
pub enum TaskResult {
    Loaded { seq: u64, container: Container, data: Loaded },
    Mutated { origin: Origin, response: ApiResponse },
    UploadProgress { sent: u64, total: u64 },
    Uploaded(ApiResponse),
}

pub struct TaskRunner {
    api: ApiClient,
    sender: Sender<TaskResult>,
    receiver: Receiver<TaskResult>,
    repaint: Option<egui::Context>,
}

impl TaskRunner {
    pub fn new(api: ApiClient, repaint: Option<egui::Context>) -> Self {
        let (sender, receiver) = channel();
        Self { api, sender, receiver, repaint }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Points later commands at a different backend; in-flight ones finish on the old one
    pub fn set_api(&mut self, api: ApiClient) {
        self.api = api;
    }

    fn context(&self) -> (ApiClient, Sender<TaskResult>, Option<egui::Context>) {
        (self.api.clone(), self.sender.clone(), self.repaint.clone())
    }

    pub fn spawn_load(&self, load: Load, seq: u64, delay: Option<Duration>) {
        let (api, sender, repaint) = self.context();
        thread::spawn(move || {
            if let Some(delay) = delay {
                thread::sleep(delay);
            }
            let container = load.container();
            let data = fetch(&api, &load);
            let _ = sender.send(TaskResult::Loaded { seq, container, data });
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    pub fn spawn_mutation(&self, mutation: Mutation) {
        let (api, sender, repaint) = self.context();
        log::info!("{} {} ({:?})", mutation.method.as_str(), mutation.path, mutation.origin);
        thread::spawn(move || {
            let response = mutation.execute(&api);
            let _ = sender.send(TaskResult::Mutated { origin: mutation.origin, response });
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    pub fn spawn_upload(&self, job: UploadJob) {
        let (api, sender, repaint) = self.context();
        thread::spawn(move || {
            let progress_sender = sender.clone();
            let progress_repaint = repaint.clone();
            // Progress events are throttled to whole-percent changes
            let mut last_percent = u64::MAX;
            let mut on_progress = |sent: u64, total: u64| {
                let percent = if total == 0 { 100 } else { sent * 100 / total };
                if percent != last_percent {
                    last_percent = percent;
                    let _ = progress_sender.send(TaskResult::UploadProgress { sent, total });
                    if let Some(ctx) = &progress_repaint {
                        ctx.request_repaint();
                    }
                }
            };
            let response = api.upload_video(&job.title, &job.path, &mut on_progress);
            let _ = sender.send(TaskResult::Uploaded(response));
            if let Some(ctx) = repaint {
                ctx.request_repaint();
            }
        });
    }

    /// Non-blocking drain, one result at a time
    pub fn try_recv(&self) -> Option<TaskResult> {
        self.receiver.try_recv().ok()
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TaskResult> {
        self.receiver.recv_timeout(timeout).ok()
    }
}
