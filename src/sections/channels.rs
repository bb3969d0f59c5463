//! Channels management: status-joined cards, start/stop/delete and the add form

use eframe::egui;
use serde_json::json;

use super::{create_outcome, ListView, Outcome, UiAction};
use crate::api::{ApiClient, ApiResponse};
use crate::controller::{Modal, Notice};
use crate::format;
use crate::models::{Channel, ChannelList, Section, StatusReport};
use crate::sections::videos::VideoOption;
use crate::tasks::{Mutation, Origin};
use crate::widgets;

pub const PLACEHOLDER: &str = "Belum ada channel. Tambah channel baru!";

pub const ENCODING_MODES: [&str; 2] = ["copy", "encode"];
pub const PRESETS: [&str; 4] = ["ultrafast", "veryfast", "fast", "medium"];
pub const TIMEZONES: [&str; 4] = ["Asia/Jakarta", "Asia/Makassar", "Asia/Jayapura", "UTC"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelsData {
    pub channels: Vec<Channel>,
    pub status: StatusReport,
}

pub fn load(api: &ApiClient) -> ChannelsData {
    let list: ChannelList = api.get_as("/channels");
    let status: StatusReport = api.get_as("/status");
    ChannelsData {
        channels: list.channels,
        status,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelCard {
    pub id: i64,
    pub name: String,
    pub streaming: bool,
    pub badge: &'static str,
    pub schedule: String,
    pub video_ready: bool,
    pub video: &'static str,
    pub can_start: bool,
    pub can_stop: bool,
    pub can_delete: bool,
}

/// Joins channels with `/status` by id; a channel missing from the report
/// is stopped and its video counts as missing.
pub fn build(data: &ChannelsData) -> ListView<ChannelCard> {
    let cards = data
        .channels
        .iter()
        .map(|channel| {
            let status = data.status.find(channel.id);
            let streaming = status.map(|s| s.running).unwrap_or(false);
            let video_ready = status.map(|s| s.video_exists).unwrap_or(false);
            ChannelCard {
                id: channel.id,
                name: channel.name.clone(),
                streaming,
                badge: if streaming { "🔴 Streaming" } else { "⚫ Stopped" },
                schedule: format!(
                    "{} - {}",
                    channel.start_time.as_deref().unwrap_or("--:--"),
                    channel.end_time.as_deref().unwrap_or("--:--")
                ),
                video_ready,
                video: if video_ready { "✅ Ready" } else { "❌ Missing" },
                can_start: !streaming,
                can_stop: streaming,
                can_delete: !streaming,
            }
        })
        .collect();
    ListView::new(cards, PLACEHOLDER)
}

pub fn start(id: i64) -> UiAction {
    UiAction::Mutate(Mutation::post(Origin::StartChannel, format!("/start/{}", id), json!({})))
}

pub fn stop(id: i64) -> UiAction {
    UiAction::Mutate(Mutation::post(Origin::StopChannel, format!("/stop/{}", id), json!({})))
}

pub fn delete(id: i64) -> UiAction {
    UiAction::Confirm {
        prompt: "Are you sure you want to delete this channel?".to_string(),
        mutation: Mutation::delete(Origin::DeleteChannel, format!("/channels/{}", id)),
    }
}

pub fn stop_all() -> UiAction {
    UiAction::Confirm {
        prompt: "Stop all running streams?".to_string(),
        mutation: Mutation::post(Origin::StopAll, "/stop-all", json!({})),
    }
}

pub fn outcome(origin: Origin, response: &ApiResponse) -> Outcome {
    let notice = Notice::from_outcome(response.success, response.message.clone());
    match origin {
        Origin::AddChannel => create_outcome(response, notice, Modal::AddChannel, Section::Channels),
        // start/stop/delete refresh whatever the verdict
        _ => Outcome::notice(notice).reload(Section::Channels),
    }
}

/// Create request for a valid form, otherwise the blocking notice
pub fn submit_action(form: &ChannelForm) -> UiAction {
    match form.submit() {
        Ok(mutation) => UiAction::Mutate(mutation),
        Err(message) => UiAction::Notify(Notice::error(message)),
    }
}

/// Add-channel form
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelForm {
    pub name: String,
    pub stream_key: String,
    pub video_options: Vec<VideoOption>,
    pub video_id: Option<i64>,
    pub video_path: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub timezone: String,
    pub encoding_mode: String,
    pub bitrate: String,
    pub fps: u32,
    pub preset: String,
    pub show_advanced: bool,
}

impl Default for ChannelForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            stream_key: String::new(),
            video_options: Vec::new(),
            video_id: None,
            video_path: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            start_time: "08:00".to_string(),
            end_time: "20:00".to_string(),
            timezone: "Asia/Jakarta".to_string(),
            encoding_mode: "copy".to_string(),
            bitrate: "4000k".to_string(),
            fps: 30,
            preset: "veryfast".to_string(),
            show_advanced: false,
        }
    }
}

impl ChannelForm {
    /// Clears typed values; the library list survives
    pub fn reset(&mut self) {
        let options = std::mem::take(&mut self.video_options);
        *self = Self {
            video_options: options,
            ..Self::default()
        };
    }

    /// Refills the library picker, keeping the operator's pick
    pub fn set_video_options(&mut self, options: Vec<VideoOption>, selected: Option<i64>) {
        self.video_options = options;
        if selected.is_some() {
            self.video_id = selected;
        }
    }

    pub fn shows_encoding_options(&self) -> bool {
        self.encoding_mode == "encode"
    }

    /// Checks the form and builds the create request
    pub fn submit(&self) -> Result<Mutation, String> {
        if format::start_after_end(&self.start_date, &self.end_date) {
            return Err("Start date cannot be greater than end date!".to_string());
        }
        if self.video_path.trim().is_empty() {
            return Err("Please select a video from library!".to_string());
        }

        let optional = |value: &str| {
            if value.trim().is_empty() {
                serde_json::Value::Null
            } else {
                json!(value.trim())
            }
        };

        let body = json!({
            "name": self.name.trim(),
            "stream_key": self.stream_key.trim(),
            "video_path": self.video_path,
            "start_date": optional(&self.start_date),
            "end_date": optional(&self.end_date),
            "start_time": self.start_time,
            "end_time": self.end_time,
            "timezone": self.timezone,
            "encoding_mode": self.encoding_mode,
            "bitrate": self.bitrate,
            "fps": self.fps,
            "preset": self.preset,
        });
        Ok(Mutation::post(Origin::AddChannel, "/channels", body))
    }
}

#[derive(Default)]
pub struct ChannelsPanel {
    pub view: Option<ListView<ChannelCard>>,
    pub form: ChannelForm,
}

impl ChannelsPanel {
    pub fn apply(&mut self, data: &ChannelsData) {
        self.view = Some(build(data));
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            if ui.button("➕ Add Channel").clicked() {
                actions.push(UiAction::OpenModal(Modal::AddChannel));
            }
            if ui.button("⏹ Stop All").clicked() {
                actions.push(stop_all());
            }
            if ui.button("🔄 Refresh").clicked() {
                actions.push(UiAction::Reload(Section::Channels));
            }
        });
        ui.add_space(10.0);

        let Some(view) = &self.view else {
            widgets::loading(ui);
            return actions;
        };

        match view {
            ListView::Empty(text) => widgets::placeholder(ui, text),
            ListView::Items(cards) => {
                for card in cards {
                    widgets::card(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.heading(&card.name);
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                widgets::state_badge(ui, card.streaming, card.badge, card.badge);
                            });
                        });
                        widgets::info_row(ui, "Schedule:", &card.schedule);
                        widgets::info_row(ui, "Video:", card.video);
                        ui.add_space(6.0);
                        ui.horizontal(|ui| {
                            if ui.add_enabled(card.can_start, egui::Button::new("▶ Start")).clicked() {
                                actions.push(start(card.id));
                            }
                            if ui.add_enabled(card.can_stop, egui::Button::new("⏹ Stop")).clicked() {
                                actions.push(stop(card.id));
                            }
                            if ui.add_enabled(card.can_delete, egui::Button::new("🗑 Delete")).clicked() {
                                actions.push(delete(card.id));
                            }
                        });
                    });
                }
            }
        }
        actions
    }

    /// Body of the add-channel modal
    pub fn show_form(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let form = &mut self.form;

        ui.heading("➕ Add New Channel");
        ui.add_space(8.0);
        widgets::text_field(ui, "Channel Name", &mut form.name, "My Channel");
        widgets::text_field(ui, "Stream Key", &mut form.stream_key, "xxxx-xxxx-xxxx-xxxx");

        widgets::field_label(ui, "Video");
        let selected_text = form
            .video_options
            .iter()
            .find(|o| Some(o.id) == form.video_id)
            .map(|o| o.label.clone())
            .unwrap_or_else(|| "-- Select from Video Library --".to_string());
        let before = form.video_id;
        egui::ComboBox::from_id_salt("new_video_id")
            .selected_text(selected_text)
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut form.video_id, None, "-- Select from Video Library --");
                for option in &form.video_options {
                    ui.selectable_value(&mut form.video_id, Some(option.id), &option.label);
                }
            });
        if form.video_id != before {
            if form.video_id.is_none() {
                form.video_path.clear();
            }
            actions.push(UiAction::SelectVideo(form.video_id));
        }
        ui.add(
            egui::TextEdit::singleline(&mut form.video_path)
                .hint_text("videos/file.mp4")
                .interactive(false)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(4.0);

        ui.columns(2, |cols| {
            widgets::text_field(&mut cols[0], "Start Date", &mut form.start_date, "YYYY-MM-DD");
            widgets::text_field(&mut cols[1], "End Date", &mut form.end_date, "YYYY-MM-DD");
            widgets::text_field(&mut cols[0], "Start Time", &mut form.start_time, "08:00");
            widgets::text_field(&mut cols[1], "End Time", &mut form.end_time, "20:00");
        });

        ui.checkbox(&mut form.show_advanced, "Show advanced settings");
        if form.show_advanced {
            egui::ComboBox::from_label("Timezone")
                .selected_text(form.timezone.clone())
                .show_ui(ui, |ui| {
                    for tz in TIMEZONES {
                        ui.selectable_value(&mut form.timezone, tz.to_string(), tz);
                    }
                });
            egui::ComboBox::from_label("Encoding Mode")
                .selected_text(form.encoding_mode.clone())
                .show_ui(ui, |ui| {
                    for mode in ENCODING_MODES {
                        ui.selectable_value(&mut form.encoding_mode, mode.to_string(), mode);
                    }
                });
            if form.shows_encoding_options() {
                widgets::text_field(ui, "Bitrate", &mut form.bitrate, "4000k");
                ui.horizontal(|ui| {
                    ui.label("FPS");
                    ui.add(egui::DragValue::new(&mut form.fps).range(1..=60));
                });
                egui::ComboBox::from_label("Preset")
                    .selected_text(form.preset.clone())
                    .show_ui(ui, |ui| {
                        for preset in PRESETS {
                            ui.selectable_value(&mut form.preset, preset.to_string(), preset);
                        }
                    });
            }
        }

        let ready = !form.name.trim().is_empty() && !form.stream_key.trim().is_empty();
        match widgets::form_buttons(ui, "Add Channel", ready) {
            Some(widgets::FormButton::Submit) => actions.push(submit_action(form)),
            Some(widgets::FormButton::Cancel) => actions.push(UiAction::CloseModal(Modal::AddChannel)),
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

    fn filled_form() -> ChannelForm {
        ChannelForm {
            name: "News".to_string(),
            stream_key: "abcd-efgh".to_string(),
            video_id: Some(3),
            video_path: "videos/news.mp4".to_string(),
            ..ChannelForm::default()
        }
    }

    #[test]
    fn test_streaming_channel_card() {
        let fake = FakeTransport::new();
        fake.route(Method::Get, "/channels", r#"{"channels":[{"id":1,"name":"A"}]}"#);
        fake.route(
            Method::Get,
            "/status",
            r#"{"channels":[{"id":1,"running":true,"video_exists":true}]}"#,
        );
        let data = load(&client(&fake));

        let view = build(&data);
        let card = &view.items()[0];
        assert_eq!(card.name, "A");
        assert!(card.streaming);
        assert_eq!(card.badge, "🔴 Streaming");
        assert!(card.can_stop);
        assert!(!card.can_start);
        assert!(!card.can_delete);
        assert_eq!(card.video, "✅ Ready");
    }

    #[test]
    fn test_unmatched_channel_is_stopped() {
        let data = ChannelsData {
            channels: vec![
                Channel { id: 1, name: "A".into(), ..Default::default() },
                Channel {
                    id: 2,
                    name: "B".into(),
                    start_time: Some("06:00".into()),
                    end_time: Some("23:00".into()),
                    ..Default::default()
                },
            ],
            status: serde_json::from_str(r#"{"channels":[{"id":1,"running":true,"video_exists":true}]}"#).unwrap(),
        };
        let view = build(&data);
        let b = &view.items()[1];
        assert!(!b.streaming);
        assert_eq!(b.badge, "⚫ Stopped");
        assert!(b.can_start && b.can_delete && !b.can_stop);
        assert_eq!(b.video, "❌ Missing");
        assert_eq!(b.schedule, "06:00 - 23:00");
    }

    #[test]
    fn test_empty_list_placeholder() {
        let fake = FakeTransport::new();
        fake.route(Method::Get, "/channels", r#"{"channels":[]}"#);
        let data = load(&client(&fake));
        assert_eq!(build(&data), ListView::Empty("Belum ada channel. Tambah channel baru!"));
    }

    #[test]
    fn test_build_is_idempotent() {
        let data = ChannelsData {
            channels: vec![Channel { id: 5, name: "Loop".into(), ..Default::default() }],
            status: StatusReport::default(),
        };
        assert_eq!(build(&data), build(&data));
    }

    #[test]
    fn test_start_date_after_end_blocks_submit() {
        let form = ChannelForm {
            start_date: "2024-06-10".to_string(),
            end_date: "2024-06-01".to_string(),
            ..filled_form()
        };
        assert_eq!(form.submit(), Err("Start date cannot be greater than end date!".to_string()));
    }

    #[test]
    fn test_missing_video_blocks_submit() {
        let form = ChannelForm { video_path: String::new(), ..filled_form() };
        assert_eq!(form.submit(), Err("Please select a video from library!".to_string()));
    }

    #[test]
    fn test_submit_body() {
        let form = ChannelForm { start_date: "2024-06-01".to_string(), ..filled_form() };
        let mutation = form.submit().unwrap();
        assert_eq!(mutation.path, "/channels");
        assert_eq!(mutation.method, Method::Post);
        let body = mutation.body.unwrap();
        assert_eq!(body["name"], "News");
        assert_eq!(body["start_date"], "2024-06-01");
        assert!(body["end_date"].is_null());
        assert_eq!(body["fps"], 30);
        assert_eq!(body["timezone"], "Asia/Jakarta");
        assert_eq!(body["preset"], "veryfast");
    }

    #[test]
    fn test_duplicate_key_keeps_modal_open() {
        let response = ApiResponse::from_value(json!({"success": false, "message": "duplicate key"}));
        let outcome = outcome(Origin::AddChannel, &response);
        assert_eq!(outcome.notice, Notice::error("duplicate key"));
        assert_eq!(outcome.close, None);
        assert_eq!(outcome.reload, None);
    }

    #[test]
    fn test_created_closes_and_reloads() {
        let response = ApiResponse::from_value(json!({"success": true, "message": "Channel ditambahkan"}));
        let outcome = outcome(Origin::AddChannel, &response);
        assert_eq!(outcome.close, Some(Modal::AddChannel));
        assert_eq!(outcome.reload, Some(Section::Channels));
    }

    #[test]
    fn test_start_stop_reload_regardless() {
        let failed = ApiResponse::failed("Video tidak ditemukan");
        for origin in [Origin::StartChannel, Origin::StopChannel, Origin::DeleteChannel, Origin::StopAll] {
            let outcome = outcome(origin, &failed);
            assert_eq!(outcome.reload, Some(Section::Channels));
            assert_eq!(outcome.notice.text, "Video tidak ditemukan");
        }
    }

    #[test]
    fn test_destructive_actions_ask_first() {
        match delete(4) {
            UiAction::Confirm { prompt, mutation } => {
                assert_eq!(prompt, "Are you sure you want to delete this channel?");
                assert_eq!(mutation.path, "/channels/4");
                assert_eq!(mutation.method, Method::Delete);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(stop_all(), UiAction::Confirm { .. }));
        assert!(matches!(start(4), UiAction::Mutate(m) if m.path == "/start/4"));
    }

    #[test]
    fn test_reset_keeps_library() {
        let mut form = filled_form();
        form.video_options = vec![VideoOption { id: 3, label: "News (12.5MB)".into() }];
        form.reset();
        assert_eq!(form.name, "");
        assert_eq!(form.video_id, None);
        assert_eq!(form.video_options.len(), 1);
        assert_eq!(form.start_time, "08:00");
    }
}
