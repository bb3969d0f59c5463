//! Backend log tail

use eframe::egui;

use super::ListView;
use crate::api::ApiClient;
use crate::models::LogList;
use crate::widgets;

pub const PLACEHOLDER: &str = "No logs yet...";

pub fn load(api: &ApiClient) -> Vec<String> {
    let list: LogList = api.get_as("/logs");
    list.logs
}

pub fn build(lines: &[String]) -> ListView<String> {
    ListView::new(lines.to_vec(), PLACEHOLDER)
}

/// Colour for a log line, keyed on the level tag the streaming service writes
pub fn line_color(line: &str) -> egui::Color32 {
    if line.contains("ERROR") || line.contains("❌") {
        widgets::RED
    } else if line.contains("WARN") || line.contains("⚠") {
        widgets::AMBER
    } else if line.contains("✅") {
        widgets::GREEN
    } else {
        egui::Color32::GRAY
    }
}

#[derive(Default)]
pub struct LogsPanel {
    pub view: Option<ListView<String>>,
}

impl LogsPanel {
    pub fn apply(&mut self, lines: &[String]) {
        self.view = Some(build(lines));
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(view) = &self.view else {
            widgets::loading(ui);
            return;
        };

        // newest lines stay in view
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| match view {
                ListView::Empty(text) => {
                    ui.label(egui::RichText::new(*text).monospace().color(widgets::MUTED));
                }
                ListView::Items(lines) => {
                    for line in lines {
                        ui.label(egui::RichText::new(line).monospace().color(line_color(line)));
                    }
                }
            });
    }
}
