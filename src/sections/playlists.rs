//! Video playlists

use eframe::egui;
use serde_json::json;

use super::{create_outcome, message_or, ListView, Outcome, UiAction};
use crate::api::{ApiClient, ApiResponse};
use crate::controller::{Modal, Notice};
use crate::models::{Playlist, PlaylistList, Section};
use crate::tasks::{Mutation, Origin};
use crate::widgets;

pub const PLACEHOLDER: &str = "No playlists yet. Create your first playlist!";

pub const PLAYBACK_MODES: [&str; 3] = ["sequential", "shuffle", "random"];

pub fn load(api: &ApiClient) -> Vec<Playlist> {
    let list: PlaylistList = api.get_as("/playlists");
    list.playlists
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistCard {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub videos: String,
    pub mode: String,
}

pub fn build(playlists: &[Playlist]) -> ListView<PlaylistCard> {
    let cards = playlists
        .iter()
        .map(|p| PlaylistCard {
            id: p.id,
            name: p.name.clone(),
            description: p
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "No description".to_string()),
            videos: format!("{} videos", p.video_count),
            mode: p.playback_mode.clone(),
        })
        .collect();
    ListView::new(cards, PLACEHOLDER)
}

pub fn view(_id: i64) -> UiAction {
    UiAction::Notify(Notice::info("Playlist details view - Coming soon!"))
}

pub fn delete(id: i64) -> UiAction {
    UiAction::Confirm {
        prompt: "Delete this playlist?".to_string(),
        mutation: Mutation::delete(Origin::DeletePlaylist, format!("/playlists/{}", id)),
    }
}

pub fn outcome(origin: Origin, response: &ApiResponse) -> Outcome {
    match origin {
        Origin::AddPlaylist => {
            let notice = if response.success {
                Notice::success("Playlist created successfully!")
            } else {
                Notice::error(message_or(response, "Failed to create playlist"))
            };
            create_outcome(response, notice, Modal::AddPlaylist, Section::Playlists)
        }
        _ => {
            let notice = if response.success {
                Notice::success("Playlist deleted")
            } else {
                Notice::error(response.message.clone())
            };
            Outcome::notice(notice).reload(Section::Playlists)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistForm {
    pub name: String,
    pub description: String,
    pub playback_mode: String,
}

impl Default for PlaylistForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            playback_mode: PLAYBACK_MODES[0].to_string(),
        }
    }
}

impl PlaylistForm {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn submit(&self) -> Mutation {
        Mutation::post(
            Origin::AddPlaylist,
            "/playlists",
            json!({
                "name": self.name.trim(),
                "description": self.description.trim(),
                "playback_mode": self.playback_mode,
            }),
        )
    }
}

#[derive(Default)]
pub struct PlaylistsPanel {
    pub view: Option<ListView<PlaylistCard>>,
    pub form: PlaylistForm,
}

impl PlaylistsPanel {
    pub fn apply(&mut self, playlists: &[Playlist]) {
        self.view = Some(build(playlists));
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();

        if ui.button("➕ Create Playlist").clicked() {
            actions.push(UiAction::OpenModal(Modal::AddPlaylist));
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
                            ui.vertical(|ui| {
                                ui.heading(&card.name);
                                ui.label(egui::RichText::new(&card.description).small().color(widgets::MUTED));
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                widgets::badge(ui, &card.videos, widgets::ACCENT);
                            });
                        });
                        widgets::info_row(ui, "Mode:", &card.mode);
                        ui.horizontal(|ui| {
                            if ui.button("👁 View").clicked() {
                                actions.push(view(card.id));
                            }
                            if ui.button("🗑 Delete").clicked() {
                                actions.push(delete(card.id));
                            }
                        });
                    });
                }
            }
        }
        actions
    }

    pub fn show_form(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let form = &mut self.form;

        ui.heading("➕ Create Playlist");
        ui.add_space(8.0);
        widgets::text_field(ui, "Name", &mut form.name, "Morning rotation");
        widgets::field_label(ui, "Description");
        ui.add(egui::TextEdit::multiline(&mut form.description).desired_rows(3).desired_width(f32::INFINITY));
        egui::ComboBox::from_label("Playback Mode")
            .selected_text(form.playback_mode.clone())
            .show_ui(ui, |ui| {
                for mode in PLAYBACK_MODES {
                    ui.selectable_value(&mut form.playback_mode, mode.to_string(), mode);
                }
            });

        match widgets::form_buttons(ui, "Create", form.is_complete()) {
            Some(widgets::FormButton::Submit) => actions.push(UiAction::Mutate(form.submit())),
            Some(widgets::FormButton::Cancel) => actions.push(UiAction::CloseModal(Modal::AddPlaylist)),
            None => {}
        }
        actions
    }
}
