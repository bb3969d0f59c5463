//! Multi-platform RTMP destinations, grouped per channel

use std::collections::BTreeMap;

use eframe::egui;
use serde_json::json;

use super::scheduler::channel_picker;
use super::{create_outcome, message_or, ListView, Outcome, UiAction};
use crate::api::{ApiClient, ApiResponse};
use crate::controller::{Modal, Notice};
use crate::format;
use crate::models::{ChannelOption, Platform, PlatformList, Section};
use crate::tasks::{Mutation, Origin};
use crate::widgets;

pub const PLACEHOLDER: &str = "No platforms configured. Add your first platform!";

pub const PLATFORM_NAMES: [&str; 4] = ["youtube", "facebook", "twitch", "custom"];

pub fn load(api: &ApiClient) -> Vec<Platform> {
    let list: PlatformList = api.get_as("/platforms");
    list.platforms
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformRow {
    pub id: i64,
    pub label: String,
    pub key: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformGroup {
    pub channel_id: i64,
    pub title: String,
    pub rows: Vec<PlatformRow>,
}

/// Buckets destinations by channel id, groups in ascending id order. The
/// group is named after its first destination's channel.
pub fn build(platforms: &[Platform]) -> ListView<PlatformGroup> {
    let mut by_channel: BTreeMap<i64, Vec<&Platform>> = BTreeMap::new();
    for platform in platforms {
        by_channel.entry(platform.channel_id).or_default().push(platform);
    }

    let groups = by_channel
        .into_iter()
        .map(|(channel_id, items)| {
            let name = items
                .first()
                .and_then(|p| p.channel_name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Channel {}", channel_id));
            PlatformGroup {
                channel_id,
                title: format!("📺 {}", name),
                rows: items
                    .iter()
                    .map(|p| PlatformRow {
                        id: p.id,
                        label: format!("{} {}", format::platform_icon(&p.platform_name), p.platform_name.to_uppercase()),
                        key: format!("Key: {}", p.stream_key),
                        enabled: p.enabled,
                    })
                    .collect(),
            }
        })
        .collect();
    ListView::new(groups, PLACEHOLDER)
}

pub fn delete(id: i64) -> UiAction {
    UiAction::Confirm {
        prompt: "Delete this platform destination?".to_string(),
        mutation: Mutation::delete(Origin::DeletePlatform, format!("/platforms/{}", id)),
    }
}

pub fn outcome(origin: Origin, response: &ApiResponse) -> Outcome {
    match origin {
        Origin::AddPlatform => {
            let notice = if response.success {
                Notice::success("Platform added successfully!")
            } else {
                Notice::error(message_or(response, "Failed to add platform"))
            };
            create_outcome(response, notice, Modal::AddPlatform, Section::Platforms)
        }
        _ => {
            let notice = if response.success {
                Notice::success("Platform deleted")
            } else {
                Notice::error(response.message.clone())
            };
            Outcome::notice(notice).reload(Section::Platforms)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformForm {
    pub channel_id: Option<i64>,
    pub platform_name: String,
    pub rtmp_url: String,
    pub stream_key: String,
    pub priority: i64,
}

impl Default for PlatformForm {
    fn default() -> Self {
        let platform_name = PLATFORM_NAMES[0].to_string();
        Self {
            rtmp_url: format::rtmp_preset(&platform_name).unwrap_or_default().to_string(),
            platform_name,
            channel_id: None,
            stream_key: String::new(),
            priority: 1,
        }
    }
}

impl PlatformForm {
    /// Switches platform; known platforms prefill their ingest URL, others clear it
    pub fn set_platform(&mut self, name: &str) {
        self.platform_name = name.to_string();
        self.rtmp_url = format::rtmp_preset(name).unwrap_or_default().to_string();
    }

    pub fn is_complete(&self) -> bool {
        self.channel_id.is_some() && !self.rtmp_url.trim().is_empty() && !self.stream_key.trim().is_empty()
    }

    pub fn submit(&self) -> Option<Mutation> {
        let channel_id = self.channel_id?;
        Some(Mutation::post(
            Origin::AddPlatform,
            "/platforms",
            json!({
                "channel_id": channel_id,
                "platform_name": self.platform_name,
                "rtmp_url": self.rtmp_url.trim(),
                "stream_key": self.stream_key.trim(),
                "priority": self.priority,
            }),
        ))
    }
}

#[derive(Default)]
pub struct PlatformsPanel {
    pub view: Option<ListView<PlatformGroup>>,
    pub form: PlatformForm,
}

impl PlatformsPanel {
    pub fn apply(&mut self, platforms: &[Platform]) {
        self.view = Some(build(platforms));
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();

        if ui.button("➕ Add Platform").clicked() {
            actions.push(UiAction::OpenModal(Modal::AddPlatform));
        }
        ui.add_space(10.0);

        let Some(list) = &self.view else {
            widgets::loading(ui);
            return actions;
        };

        match list {
            ListView::Empty(text) => widgets::placeholder(ui, text),
            ListView::Items(groups) => {
                for group in groups {
                    widgets::card(ui, |ui| {
                        ui.heading(&group.title);
                        ui.add_space(6.0);
                        for row in &group.rows {
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.label(egui::RichText::new(&row.label).strong());
                                    ui.label(egui::RichText::new(&row.key).small().color(widgets::MUTED));
                                });
                                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                    if ui.button("🗑").clicked() {
                                        actions.push(delete(row.id));
                                    }
                                    widgets::state_badge(ui, row.enabled, "✅ Enabled", "❌ Disabled");
                                });
                            });
                            ui.separator();
                        }
                    });
                }
            }
        }
        actions
    }

    pub fn show_form(&mut self, ui: &mut egui::Ui, channels: &[ChannelOption]) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let form = &mut self.form;

        ui.heading("📡 Add Platform");
        ui.add_space(8.0);

        widgets::field_label(ui, "Channel");
        channel_picker(ui, "new_platform_channel", &mut form.channel_id, channels);

        let mut picked = form.platform_name.clone();
        egui::ComboBox::from_label("Platform")
            .selected_text(format!("{} {}", format::platform_icon(&picked), picked))
            .show_ui(ui, |ui| {
                for name in PLATFORM_NAMES {
                    ui.selectable_value(&mut picked, name.to_string(), name);
                }
            });
        if picked != form.platform_name {
            form.set_platform(&picked);
        }

        widgets::text_field(ui, "RTMP URL", &mut form.rtmp_url, "rtmp://...");
        widgets::text_field(ui, "Stream Key", &mut form.stream_key, "xxxx-xxxx");
        ui.horizontal(|ui| {
            ui.label("Priority");
            ui.add(egui::DragValue::new(&mut form.priority).range(1..=10));
        });

        match widgets::form_buttons(ui, "Add Platform", form.is_complete()) {
            Some(widgets::FormButton::Submit) => {
                if let Some(mutation) = form.submit() {
                    actions.push(UiAction::Mutate(mutation));
                }
            }
            Some(widgets::FormButton::Cancel) => actions.push(UiAction::CloseModal(Modal::AddPlatform)),
            None => {}
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::{client, FakeTransport};

    fn platform(id: i64, channel_id: i64, name: Option<&str>, platform_name: &str) -> Platform {
        Platform {
            id,
            channel_id,
            channel_name: name.map(str::to_string),
            platform_name: platform_name.to_string(),
            stream_key: format!("key-{}", id),
            enabled: id % 2 == 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_grouped_by_channel() {
        let list = vec![
            platform(1, 7, Some("Music"), "youtube"),
            platform(2, 3, None, "twitch"),
            platform(3, 7, Some("Music"), "custom"),
        ];
        let view = build(&list);
        let groups = view.items();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].channel_id, 3);
        assert_eq!(groups[0].title, "📺 Channel 3");
        assert_eq!(groups[0].rows[0].label, "🎮 TWITCH");
        assert_eq!(groups[1].title, "📺 Music");
        assert_eq!(groups[1].rows.len(), 2);
        assert_eq!(groups[1].rows[1].label, "📡 CUSTOM");
        assert_eq!(groups[1].rows[0].key, "Key: key-1");
    }

    #[test]
    fn test_placeholder_from_backend() {
        let fake = FakeTransport::new();
        fake.route(Method::Get, "/platforms", r#"{"platforms":[]}"#);
        assert_eq!(
            build(&load(&client(&fake))),
            ListView::Empty("No platforms configured. Add your first platform!")
        );
    }

    #[test]
    fn test_rtmp_presets() {
        let mut form = PlatformForm::default();
        assert_eq!(form.rtmp_url, "rtmp://a.rtmp.youtube.com/live2/");
        form.set_platform("facebook");
        assert_eq!(form.rtmp_url, "rtmps://live-api-s.facebook.com:443/rtmp/");
        form.set_platform("custom");
        assert_eq!(form.rtmp_url, "");
    }

    #[test]
    fn test_form_body() {
        let form = PlatformForm {
            channel_id: Some(7),
            stream_key: "abc".to_string(),
            priority: 2,
            ..Default::default()
        };
        assert!(form.is_complete());
        assert_eq!(
            form.submit().unwrap().body,
            Some(json!({
                "channel_id": 7,
                "platform_name": "youtube",
                "rtmp_url": "rtmp://a.rtmp.youtube.com/live2/",
                "stream_key": "abc",
                "priority": 2
            }))
        );
    }

    #[test]
    fn test_outcomes() {
        let ok = outcome(Origin::AddPlatform, &ApiResponse::from_value(json!({"success": true})));
        assert_eq!(ok.notice.text, "Platform added successfully!");
        assert_eq!(ok.close, Some(Modal::AddPlatform));
        let bad = outcome(Origin::AddPlatform, &ApiResponse::failed("Channel not found"));
        assert_eq!(bad.notice, Notice::error("Channel not found"));
        let deleted = outcome(Origin::DeletePlatform, &ApiResponse::from_value(json!({"success": true})));
        assert_eq!(deleted.notice.text, "Platform deleted");
        assert_eq!(deleted.reload, Some(Section::Platforms));
    }
}
