//! Channel analytics, peak hours, video performance and report export

use eframe::egui;

use super::{ListView, UiAction};
use crate::api::ApiClient;
use crate::format;
use crate::models::{ChannelAnalytics, ChannelOption, PeakHour, PeakHourList, VideoPerformance};
use crate::tasks::Load;
use crate::widgets;

pub const NO_DATA: &str = "No data available";

pub const DAY_WINDOWS: [u32; 4] = [7, 30, 90, 365];

const TOP_VIDEOS: usize = 10;

/// Selected channel (none = all channels) and look-back window
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsQuery {
    pub channel_id: Option<i64>,
    pub days: u32,
}

impl AnalyticsQuery {
    pub fn peak_hours_path(&self) -> String {
        match self.channel_id {
            Some(id) => format!("/analytics/peak-hours?channel_id={}&days={}", id, self.days),
            None => format!("/analytics/peak-hours?days={}", self.days),
        }
    }

    /// Path of the downloadable report, relative to the API prefix
    pub fn export_path(&self) -> String {
        let mut path = format!("/analytics/export?type=channel&days={}&format=json", self.days);
        if let Some(id) = self.channel_id {
            path.push_str(&format!("&channel_id={}", id));
        }
        path
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsData {
    /// Only fetched when a single channel is selected
    pub channel: Option<ChannelAnalytics>,
    pub peak_hours: Vec<PeakHour>,
    pub videos: Vec<VideoPerformance>,
}

pub fn load(api: &ApiClient, query: &AnalyticsQuery) -> AnalyticsData {
    let channel = query.channel_id.map(|id| {
        api.get_as::<ChannelAnalytics>(&format!("/analytics/channel/{}?days={}", id, query.days))
    });
    let peak_hours: PeakHourList = api.get_as(&query.peak_hours_path());
    let videos: Vec<VideoPerformance> =
        api.get_as(&format!("/analytics/video-performance?days={}", query.days));
    AnalyticsData {
        channel,
        peak_hours: peak_hours.peak_hours,
        videos,
    }
}

pub fn export_url(api: &ApiClient, query: &AnalyticsQuery) -> String {
    api.url(&query.export_path())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSummary {
    pub total_sessions: String,
    pub success_rate: String,
    pub uptime: String,
    pub average_duration: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeakRow {
    pub range: String,
    pub sessions: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoRow {
    pub title: String,
    pub used: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView {
    pub summary: Option<ChannelSummary>,
    pub peak_hours: ListView<PeakRow>,
    pub videos: ListView<VideoRow>,
}

pub fn build(data: &AnalyticsData) -> AnalyticsView {
    let summary = data.channel.as_ref().map(|c| ChannelSummary {
        total_sessions: c.total_sessions.to_string(),
        success_rate: format::format_percent(c.success_rate),
        uptime: format::format_percent(c.uptime_percentage),
        average_duration: format::format_hours_minutes(c.average_session_duration as i64),
    });

    let peak_rows = data
        .peak_hours
        .iter()
        .map(|h| PeakRow {
            range: format!("{}:00 - {}:00", h.hour, h.hour + 1),
            sessions: format!("{} sessions", h.sessions),
        })
        .collect();

    let video_rows = data
        .videos
        .iter()
        .take(TOP_VIDEOS)
        .map(|v| VideoRow {
            title: v.video_title.clone(),
            used: format!("Used {} times", v.usage_count),
            duration: format::format_hours_minutes(v.total_duration),
        })
        .collect();

    AnalyticsView {
        summary,
        peak_hours: ListView::new(peak_rows, NO_DATA),
        videos: ListView::new(video_rows, NO_DATA),
    }
}

pub struct AnalyticsPanel {
    pub view: Option<AnalyticsView>,
    pub channel_id: Option<i64>,
    pub days: u32,
}

impl AnalyticsPanel {
    pub fn new(days: u32) -> Self {
        Self {
            view: None,
            channel_id: None,
            days,
        }
    }

    pub fn query(&self) -> AnalyticsQuery {
        AnalyticsQuery {
            channel_id: self.channel_id,
            days: self.days,
        }
    }

    pub fn apply(&mut self, data: &AnalyticsData) {
        self.view = Some(build(data));
    }

    pub fn show(&mut self, ui: &mut egui::Ui, api: &ApiClient, channels: &[ChannelOption]) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let before = self.query();

        ui.horizontal(|ui| {
            let channel_text = channels
                .iter()
                .find(|c| Some(c.id) == self.channel_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "All Channels".to_string());
            egui::ComboBox::from_id_salt("analytics_channel")
                .selected_text(channel_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.channel_id, None, "All Channels");
                    for channel in channels {
                        ui.selectable_value(&mut self.channel_id, Some(channel.id), &channel.name);
                    }
                });

            egui::ComboBox::from_id_salt("analytics_days")
                .selected_text(format!("Last {} days", self.days))
                .show_ui(ui, |ui| {
                    for days in DAY_WINDOWS {
                        ui.selectable_value(&mut self.days, days, format!("Last {} days", days));
                    }
                });

            if ui.button("🔄 Refresh").clicked() {
                actions.push(UiAction::Load(Load::Analytics(self.query())));
            }
            if ui.button("📥 Export").clicked() {
                actions.push(UiAction::OpenUrl(export_url(api, &self.query())));
            }
        });
        if self.query() != before {
            actions.push(UiAction::Load(Load::Analytics(self.query())));
        }
        ui.add_space(10.0);

        let Some(view) = &self.view else {
            widgets::loading(ui);
            return actions;
        };

        if let Some(summary) = &view.summary {
            ui.horizontal_wrapped(|ui| {
                widgets::stat_tile(ui, "Total Sessions", &summary.total_sessions);
                widgets::stat_tile(ui, "Success Rate", &summary.success_rate);
                widgets::stat_tile(ui, "Uptime", &summary.uptime);
                widgets::stat_tile(ui, "Avg Duration", &summary.average_duration);
            });
            ui.add_space(10.0);
        }

        ui.columns(2, |cols| {
            widgets::card(&mut cols[0], |ui| {
                ui.heading("⏱ Peak Hours");
                match &view.peak_hours {
                    ListView::Empty(text) => widgets::placeholder(ui, text),
                    ListView::Items(rows) => {
                        for row in rows {
                            widgets::info_row(ui, &row.range, &row.sessions);
                        }
                    }
                }
            });
            widgets::card(&mut cols[1], |ui| {
                ui.heading("🎬 Top Videos");
                match &view.videos {
                    ListView::Empty(text) => widgets::placeholder(ui, text),
                    ListView::Items(rows) => {
                        for row in rows {
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.label(egui::RichText::new(&row.title).strong());
                                    ui.label(egui::RichText::new(&row.used).small().color(widgets::MUTED));
                                });
                                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                    ui.label(&row.duration);
                                });
                            });
                        }
                    }
                }
            });
        });
        actions
    }
}
