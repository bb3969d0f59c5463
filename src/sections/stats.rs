//! Session totals and recent history

use eframe::egui;

use super::ListView;
use crate::api::ApiClient;
use crate::format;
use crate::models::{Session, SessionList, StreamStats};
use crate::widgets;

pub const HISTORY_PLACEHOLDER: &str = "No history yet";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsData {
    pub stats: StreamStats,
    pub sessions: Vec<Session>,
}

pub fn load(api: &ApiClient, history_limit: u32) -> StatsData {
    let stats: StreamStats = api.get_as("/stats");
    let history: SessionList = api.get_as(&format!("/history?limit={}", history_limit));
    StatsData {
        stats,
        sessions: history.sessions,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub started: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub total_sessions: String,
    pub total_duration: String,
    pub history: ListView<HistoryRow>,
}

pub fn build(data: &StatsData) -> StatsView {
    let rows = data
        .sessions
        .iter()
        .map(|s| HistoryRow {
            started: s
                .start_time
                .as_deref()
                .map(format::format_datetime)
                .unwrap_or_default(),
            duration: s
                .duration_formatted
                .clone()
                .unwrap_or_else(|| format::format_clip_duration(s.duration_seconds)),
        })
        .collect();

    StatsView {
        total_sessions: data.stats.total_sessions.to_string(),
        total_duration: format::format_hours_minutes(data.stats.total_duration_seconds),
        history: ListView::new(rows, HISTORY_PLACEHOLDER),
    }
}

#[derive(Default)]
pub struct StatsPanel {
    pub view: Option<StatsView>,
}

impl StatsPanel {
    pub fn apply(&mut self, data: &StatsData) {
        self.view = Some(build(data));
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            widgets::loading(ui);
            return;
        };

        ui.horizontal_wrapped(|ui| {
            widgets::stat_tile(ui, "Total Sessions", &view.total_sessions);
            widgets::stat_tile(ui, "Total Streaming Time", &view.total_duration);
        });
        ui.add_space(16.0);

        widgets::card(ui, |ui| {
            ui.heading("🕘 Recent Sessions");
            ui.add_space(6.0);
            match &view.history {
                ListView::Empty(text) => widgets::placeholder(ui, text),
                ListView::Items(rows) => {
                    for row in rows {
                        widgets::info_row(ui, &row.started, &row.duration);
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::{client, FakeTransport};

    #[test]
    fn test_totals_and_history() {
        let fake = FakeTransport::new();
        fake.route(Method::Get, "/stats", r#"{"total_sessions":4,"total_duration_seconds":12300}"#);
        fake.route(
            Method::Get,
            "/history?limit=5",
            r#"{"sessions":[{"id":9,"start_time":"2024-03-05T07:08:09","duration_seconds":3725,"duration_formatted":"1h 2m 5s"}]}"#,
        );
        let view = build(&load(&client(&fake), 5));
        assert_eq!(view.total_sessions, "4");
        assert_eq!(view.total_duration, "3h 25m");
        assert_eq!(
            view.history,
            ListView::Items(vec![HistoryRow {
                started: "05/03/2024, 07.08.09".to_string(),
                duration: "1h 2m 5s".to_string(),
            }])
        );
    }

    #[test]
    fn test_history_limit_in_query() {
        let fake = FakeTransport::new();
        let _ = load(&client(&fake), 20);
        assert_eq!(fake.count(Method::Get, "/history?limit=20"), 1);
    }

    #[test]
    fn test_empty_history() {
        let view = build(&StatsData::default());
        assert_eq!(view.history, ListView::Empty("No history yet"));
        assert_eq!(view.total_duration, "0h 0m");
    }
}
