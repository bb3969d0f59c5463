//! Overview tiles and host load bars

use eframe::egui;

use crate::api::ApiClient;
use crate::format::{self, ProgressLevel};
use crate::models::{ChannelList, StatusReport, StreamStats, SystemMetrics, VideoList};
use crate::widgets;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub channel_count: usize,
    pub total_running: i64,
    pub video_count: usize,
    pub total_size_mb: f64,
    pub stats: StreamStats,
    pub metrics: SystemMetrics,
}

pub fn load(api: &ApiClient) -> DashboardData {
    let channels: ChannelList = api.get_as("/channels");
    let status: StatusReport = api.get_as("/status");
    let videos: VideoList = api.get_as("/videos");
    let stats: StreamStats = api.get_as("/stats");
    let metrics: SystemMetrics = api.get_as("/system/metrics");

    DashboardData {
        channel_count: channels.channels.len(),
        total_running: status.total_running,
        video_count: videos.videos.len(),
        total_size_mb: videos.videos.iter().fold(0.0, |sum, v| sum + v.file_size_mb),
        stats,
        metrics,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub caption: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricBar {
    pub label: &'static str,
    pub value: String,
    pub detail: Option<String>,
    pub fraction: f32,
    pub level: ProgressLevel,
}

impl MetricBar {
    fn new(label: &'static str, percent: f64, detail: Option<String>) -> Self {
        Self {
            label,
            value: format!("{}%", percent),
            detail,
            fraction: (percent / 100.0).clamp(0.0, 1.0) as f32,
            level: ProgressLevel::for_percent(percent),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub tiles: Vec<Tile>,
    /// `None` when the host did not report metrics
    pub metrics: Option<Vec<MetricBar>>,
}

pub fn build(data: &DashboardData) -> DashboardView {
    let tiles = vec![
        Tile { caption: "Total Channels", value: data.channel_count.to_string() },
        Tile { caption: "Running Streams", value: data.total_running.to_string() },
        Tile { caption: "Total Videos", value: data.video_count.to_string() },
        Tile { caption: "Storage Used", value: format::format_storage_gb(data.total_size_mb) },
        Tile { caption: "Total Sessions", value: data.stats.total_sessions.to_string() },
        Tile { caption: "Total Duration", value: format::format_hours(data.stats.total_duration_seconds) },
    ];

    let m = &data.metrics;
    let metrics = m.success.then(|| {
        vec![
            MetricBar::new("CPU", m.cpu.percent, None),
            MetricBar::new(
                "Memory",
                m.memory.percent,
                Some(format!("{}GB / {}GB", m.memory.used_gb, m.memory.total_gb)),
            ),
            MetricBar::new(
                "Disk",
                m.disk.percent,
                Some(format!("{}GB / {}GB", m.disk.used_gb, m.disk.total_gb)),
            ),
        ]
    });

    DashboardView { tiles, metrics }
}

#[derive(Default)]
pub struct DashboardPanel {
    pub view: Option<DashboardView>,
}

impl DashboardPanel {
    pub fn apply(&mut self, data: &DashboardData) {
        self.view = Some(build(data));
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            widgets::loading(ui);
            return;
        };

        ui.horizontal_wrapped(|ui| {
            for tile in &view.tiles {
                widgets::stat_tile(ui, tile.caption, &tile.value);
            }
        });
        ui.add_space(16.0);

        if let Some(bars) = &view.metrics {
            widgets::card(ui, |ui| {
                ui.heading("🖥 System Resources");
                ui.add_space(6.0);
                for bar in bars {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(bar.label).strong());
                        ui.label(&bar.value);
                        if let Some(detail) = &bar.detail {
                            ui.label(egui::RichText::new(detail).color(widgets::MUTED));
                        }
                    });
                    ui.add(
                        egui::ProgressBar::new(bar.fraction)
                            .fill(widgets::level_color(bar.level))
                            .desired_height(10.0),
                    );
                    ui.add_space(6.0);
                }
            });
        }
    }
}
