//! Recurring start/stop tasks

use chrono::NaiveTime;
use eframe::egui;
use serde_json::json;

use super::{create_outcome, message_or, ListView, Outcome, UiAction};
use crate::api::{ApiClient, ApiResponse};
use crate::controller::{Modal, Notice};
use crate::format::{self, DAY_NAMES};
use crate::models::{ChannelOption, ScheduledTask, Section, TaskList};
use crate::tasks::{Mutation, Origin};
use crate::widgets;

pub const PLACEHOLDER: &str = "No scheduled tasks. Add your first task!";

pub const TASK_TYPES: [&str; 2] = ["start", "stop"];

pub fn load(api: &ApiClient) -> Vec<ScheduledTask> {
    let list: TaskList = api.get_as("/scheduled-tasks");
    list.tasks
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskCard {
    pub id: i64,
    pub heading: String,
    pub enabled: bool,
    pub time: String,
    pub days: String,
    pub last_run: Option<String>,
}

pub fn build(tasks: &[ScheduledTask]) -> ListView<TaskCard> {
    let cards = tasks
        .iter()
        .map(|task| {
            let icon = if task.task_type == "start" { "▶" } else { "⏹" };
            let channel = task
                .channel_name
                .clone()
                .unwrap_or_else(|| format!("Channel {}", task.channel_id));
            TaskCard {
                id: task.id,
                heading: format!("{} {} - {}", icon, task.task_type.to_uppercase(), channel),
                enabled: task.enabled,
                time: task.scheduled_time.clone(),
                days: format::decode_days(&task.days_of_week),
                last_run: task.last_run.as_deref().map(format::format_datetime),
            }
        })
        .collect();
    ListView::new(cards, PLACEHOLDER)
}

pub fn delete(id: i64) -> UiAction {
    UiAction::Confirm {
        prompt: "Delete this scheduled task?".to_string(),
        mutation: Mutation::delete(Origin::DeleteTask, format!("/scheduled-tasks/{}", id)),
    }
}

pub fn outcome(origin: Origin, response: &ApiResponse) -> Outcome {
    match origin {
        Origin::AddTask => {
            let notice = if response.success {
                Notice::success("Task scheduled successfully!")
            } else {
                Notice::error(message_or(response, "Failed to create task"))
            };
            create_outcome(response, notice, Modal::AddTask, Section::Scheduler)
        }
        _ => {
            let notice = if response.success {
                Notice::success("Task deleted")
            } else {
                Notice::error(response.message.clone())
            };
            Outcome::notice(notice).reload(Section::Scheduler)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub channel_id: Option<i64>,
    pub task_type: String,
    pub scheduled_time: String,
    pub days: [bool; 7],
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            channel_id: None,
            task_type: TASK_TYPES[0].to_string(),
            scheduled_time: String::new(),
            days: [false; 7],
        }
    }
}

impl TaskForm {
    /// Strict zero-padded `HH:MM`; `9:30` is rejected
    pub fn parsed_time(&self) -> Option<NaiveTime> {
        let raw = self.scheduled_time.trim();
        if raw.len() != 5 || raw.as_bytes()[2] != b':' {
            return None;
        }
        NaiveTime::parse_from_str(raw, "%H:%M").ok()
    }

    pub fn time_is_valid(&self) -> bool {
        self.parsed_time().is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.channel_id.is_some() && self.time_is_valid()
    }

    pub fn submit(&self) -> Option<Mutation> {
        let channel_id = self.channel_id?;
        let time = self.parsed_time()?;
        Some(Mutation::post(
            Origin::AddTask,
            "/scheduled-tasks",
            json!({
                "channel_id": channel_id,
                "task_type": self.task_type,
                "scheduled_time": time.format("%H:%M").to_string(),
                "days_of_week": format::encode_days(&self.days),
            }),
        ))
    }
}

#[derive(Default)]
pub struct SchedulerPanel {
    pub view: Option<ListView<TaskCard>>,
    pub form: TaskForm,
}

impl SchedulerPanel {
    pub fn apply(&mut self, tasks: &[ScheduledTask]) {
        self.view = Some(build(tasks));
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();

        if ui.button("➕ Add Task").clicked() {
            actions.push(UiAction::OpenModal(Modal::AddTask));
        }
        ui.add_space(10.0);

        let Some(list) = &self.view else {
            widgets::loading(ui);
            return actions;
        };

        match list {
            ListView::Empty(text) => widgets::placeholder(ui, text),
            ListView::Items(cards) => {
                for card in cards {
                    widgets::card(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.heading(&card.heading);
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                widgets::state_badge(ui, card.enabled, "✅ Enabled", "❌ Disabled");
                            });
                        });
                        widgets::info_row(ui, "Time:", &card.time);
                        widgets::info_row(ui, "Days:", &card.days);
                        if let Some(last_run) = &card.last_run {
                            widgets::info_row(ui, "Last Run:", last_run);
                        }
                        if ui.button("🗑 Delete").clicked() {
                            actions.push(delete(card.id));
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

        ui.heading("⏰ Add Scheduled Task");
        ui.add_space(8.0);

        widgets::field_label(ui, "Channel");
        channel_picker(ui, "new_task_channel", &mut form.channel_id, channels);

        egui::ComboBox::from_label("Task Type")
            .selected_text(form.task_type.to_uppercase())
            .show_ui(ui, |ui| {
                for kind in TASK_TYPES {
                    ui.selectable_value(&mut form.task_type, kind.to_string(), kind.to_uppercase());
                }
            });

        widgets::text_field(ui, "Time", &mut form.scheduled_time, "HH:MM");

        widgets::field_label(ui, "Days");
        ui.horizontal_wrapped(|ui| {
            for (checked, name) in form.days.iter_mut().zip(DAY_NAMES) {
                ui.checkbox(checked, name);
            }
        });

        match widgets::form_buttons(ui, "Schedule", form.is_complete()) {
            Some(widgets::FormButton::Submit) => {
                if let Some(mutation) = form.submit() {
                    actions.push(UiAction::Mutate(mutation));
                }
            }
            Some(widgets::FormButton::Cancel) => actions.push(UiAction::CloseModal(Modal::AddTask)),
            None => {}
        }
        actions
    }
}

/// `-- Select Channel --` combo filled from `/channels`
pub fn channel_picker(ui: &mut egui::Ui, id: &str, selected: &mut Option<i64>, channels: &[ChannelOption]) {
    let text = channels
        .iter()
        .find(|c| Some(c.id) == *selected)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "-- Select Channel --".to_string());
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            ui.selectable_value(selected, None, "-- Select Channel --");
            for channel in channels {
                ui.selectable_value(selected, Some(channel.id), &channel.name);
            }
        });
    ui.add_space(4.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::testing::{client, FakeTransport};

    #[test]
    fn test_task_cards() {
        let fake = FakeTransport::new();
        fake.route(
            Method::Get,
            "/scheduled-tasks",
            r#"{"tasks":[
                {"id":1,"channel_id":2,"channel_name":"News","task_type":"start","scheduled_time":"06:30","days_of_week":"0,2,4","enabled":true,"last_run":null},
                {"id":2,"channel_id":3,"task_type":"stop","scheduled_time":"23:00","days_of_week":"5,6","enabled":false,"last_run":"2024-03-05T23:00:00"}
            ]}"#,
        );
        let view = build(&load(&client(&fake)));
        let cards = view.items();
        assert_eq!(cards[0].heading, "▶ START - News");
        assert_eq!(cards[0].days, "Mon, Wed, Fri");
        assert_eq!(cards[0].last_run, None);
        assert_eq!(cards[1].heading, "⏹ STOP - Channel 3");
        assert_eq!(cards[1].days, "Sat, Sun");
        assert_eq!(cards[1].last_run.as_deref(), Some("05/03/2024, 23.00.00"));
        assert!(!cards[1].enabled);
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(build(&[]), ListView::Empty("No scheduled tasks. Add your first task!"));
    }

    #[test]
    fn test_form_encodes_days() {
        let mut form = TaskForm {
            channel_id: Some(2),
            scheduled_time: "07:15".to_string(),
            ..Default::default()
        };
        form.days[0] = true;
        form.days[6] = true;
        assert!(form.is_complete());
        let mutation = form.submit().unwrap();
        assert_eq!(
            mutation.body,
            Some(json!({"channel_id": 2, "task_type": "start", "scheduled_time": "07:15", "days_of_week": "0,6"}))
        );
    }

    #[test]
    fn test_form_needs_channel_and_time() {
        let form = TaskForm { scheduled_time: "07:15".into(), ..Default::default() };
        assert!(!form.is_complete());
        assert!(form.submit().is_none());
        let form = TaskForm { channel_id: Some(1), scheduled_time: "25:00".into(), ..Default::default() };
        assert!(!form.is_complete());
    }

    #[test]
    fn test_unpadded_hour_is_rejected() {
        let form = TaskForm { channel_id: Some(1), scheduled_time: "9:30".into(), ..Default::default() };
        assert!(!form.is_complete());
        assert!(form.submit().is_none());

        let form = TaskForm { channel_id: Some(1), scheduled_time: " 09:30 ".into(), ..Default::default() };
        assert_eq!(form.submit().unwrap().body.unwrap()["scheduled_time"], "09:30");
    }

    #[test]
    fn test_outcomes() {
        let ok = outcome(Origin::AddTask, &ApiResponse::from_value(json!({"success": true})));
        assert_eq!(ok.notice.text, "Task scheduled successfully!");
        assert_eq!(ok.reload, Some(Section::Scheduler));
        let bad = outcome(Origin::AddTask, &ApiResponse::from_value(json!({"success": false})));
        assert_eq!(bad.notice, Notice::error("Failed to create task"));
        assert_eq!(bad.close, None);
        let deleted = outcome(Origin::DeleteTask, &ApiResponse::from_value(json!({"success": true})));
        assert_eq!(deleted.notice.text, "Task deleted");
    }
}
