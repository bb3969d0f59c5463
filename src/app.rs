//! eframe application: drains task results, routes operator actions and
//! paints the menu, title bar, active section and overlays.

use std::time::{Duration, Instant};

use eframe::egui;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::controller::{Controller, Modal, Notice, NoticeKind};
use crate::format;
use crate::models::Section;
use crate::sections::{self, analytics, videos, Outcome, Panels, UiAction};
use crate::tasks::{Container, Load, TaskResult, TaskRunner};
use crate::widgets;

/// Base size the configured font size is scaled against
const BASE_FONT_SIZE: f32 = 12.0;

pub struct AdminApp {
    config: AppConfig,
    /// Copy edited by the settings modal until saved
    settings: AppConfig,
    controller: Controller,
    panels: Panels,
    runner: TaskRunner,
    repaint: Option<egui::Context>,
    applied_zoom: Option<f32>,
    /// Wall-clock time of the last applied load
    last_update: Option<String>,
}

impl AdminApp {
    pub fn new(config: AppConfig, repaint: Option<egui::Context>) -> Self {
        let api = ApiClient::new(&config.server_url, config.request_timeout());
        Self::with_api(config, api, repaint)
    }

    pub fn with_api(config: AppConfig, api: ApiClient, repaint: Option<egui::Context>) -> Self {
        log::info!("Backend: {}", api.server());
        Self {
            controller: Controller::new(&config.poll),
            panels: Panels::new(config.history_limit, config.analytics_days),
            runner: TaskRunner::new(api, repaint.clone()),
            settings: config.clone(),
            config,
            repaint,
            applied_zoom: None,
            last_update: None,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    pub fn show_section(&mut self, name: &str, now: Instant) {
        if let Some(section) = self.controller.show_section(name, now) {
            self.reload(section, None);
        }
    }

    fn reload(&mut self, section: Section, delay: Option<Duration>) {
        for load in self.panels.loads_for(section) {
            self.load(load, delay);
        }
    }

    fn load(&mut self, load: Load, delay: Option<Duration>) {
        let seq = self.controller.issue(load.container());
        log::debug!("Load {:?} (seq {})", load, seq);
        self.runner.spawn_load(load, seq, delay);
    }

    /// Fires the loads whose poll period elapsed
    pub fn tick(&mut self, now: Instant) {
        for section in self.controller.tick(now) {
            self.reload(section, None);
        }
    }

    fn close_modal(&mut self, modal: Modal) {
        self.controller.close_modal(modal);
        self.forget_modal(modal);
    }

    /// Drops the typed state of a modal that is no longer shown
    fn forget_modal(&mut self, modal: Modal) {
        self.panels.reset_form(modal);
        match modal {
            Modal::AddChannel => self.controller.select_video(None),
            Modal::Settings => self.settings = self.config.clone(),
            _ => {}
        }
    }

    fn close_overlays(&mut self, closed: Vec<Modal>) {
        for modal in closed {
            self.forget_modal(modal);
        }
    }

    pub fn escape(&mut self) {
        let closed = self.controller.on_escape();
        self.close_overlays(closed);
    }

    pub fn backdrop_clicked(&mut self) {
        let closed = self.controller.on_backdrop_click();
        self.close_overlays(closed);
    }

    pub fn confirm_accepted(&mut self) {
        if let Some(mutation) = self.controller.accept_confirm() {
            self.runner.spawn_mutation(mutation);
        }
    }

    pub fn dispatch(&mut self, action: UiAction) {
        match action {
            UiAction::Mutate(mutation) => self.runner.spawn_mutation(mutation),
            UiAction::Confirm { prompt, mutation } => self.controller.ask(prompt, mutation),
            UiAction::Notify(notice) => self.controller.notify(notice),
            UiAction::OpenModal(modal) => {
                self.controller.open_modal(modal);
                match modal {
                    // pickers are filled on open
                    Modal::AddChannel => self.load(Load::Videos, None),
                    Modal::AddTask | Modal::AddPlatform => self.load(Load::ChannelOptions, None),
                    Modal::Settings => self.settings = self.config.clone(),
                    _ => {}
                }
            }
            UiAction::CloseModal(modal) => self.close_modal(modal),
            UiAction::Reload(section) => self.reload(section, None),
            UiAction::Load(load) => self.load(load, None),
            UiAction::SelectVideo(id) => {
                self.controller.select_video(id);
                if let Some(id) = id {
                    self.load(Load::VideoDetail(id), None);
                }
            }
            UiAction::Upload(job) => {
                log::info!("Uploading {} ({} bytes)", job.path.display(), job.size);
                self.panels.videos.upload_started();
                self.runner.spawn_upload(job);
            }
            UiAction::OpenUrl(url) => match &self.repaint {
                Some(ctx) => ctx.open_url(egui::OpenUrl::new_tab(url)),
                None => log::warn!("No window to open {}", url),
            },
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        self.controller.notify(outcome.notice);
        if let Some(modal) = outcome.close {
            self.close_modal(modal);
        }
        if let Some(section) = outcome.reload {
            self.reload(section, outcome.reload_delay);
        }
    }

    pub fn apply_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Loaded { seq, container, data } => {
                if self.controller.accept(container, seq) {
                    self.panels.apply(data, self.controller.selected_video_id());
                    self.last_update = Some(format::timestamp_now());
                } else {
                    log::debug!("Dropping stale {:?} response (seq {})", container, seq);
                }
            }
            TaskResult::Mutated { origin, response } => {
                let outcome = sections::outcome(origin, &response);
                self.apply_outcome(outcome);
            }
            TaskResult::UploadProgress { sent, total } => self.panels.videos.upload_progress(sent, total),
            TaskResult::Uploaded(response) => {
                self.panels.videos.upload_finished(response.success);
                self.apply_outcome(videos::upload_outcome(&response));
            }
        }
    }

    fn save_settings(&mut self) {
        let server_changed = self.settings.server_url != self.config.server_url
            || self.settings.request_timeout_secs != self.config.request_timeout_secs;
        self.config = self.settings.clone();
        self.config.save();
        self.panels.history_limit = self.config.history_limit;
        self.applied_zoom = None;

        if server_changed {
            self.runner.set_api(ApiClient::new(&self.config.server_url, self.config.request_timeout()));
            log::info!("Backend changed to {}", self.runner.api().server());
            if let Some(section) = self.controller.active_section() {
                self.reload(section, None);
            }
        }
        self.close_modal(Modal::Settings);
        self.controller.notify(Notice::success("Settings saved"));
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        if self.config.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }

        let zoom = (self.config.font_size as f32 / BASE_FONT_SIZE).clamp(0.5, 2.5);
        if self.applied_zoom != Some(zoom) {
            ctx.set_zoom_factor(zoom);
            self.applied_zoom = Some(zoom);
        }
    }

    fn is_busy(&self) -> bool {
        [
            Container::Dashboard,
            Container::Channels,
            Container::Videos,
            Container::Logs,
            Container::Stats,
            Container::Playlists,
            Container::Scheduler,
            Container::Platforms,
            Container::Analytics,
            Container::Users,
        ]
        .into_iter()
        .any(|c| self.controller.is_loading(c))
    }

    fn show_menu(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let mut picked = None;

        ui.add_space(10.0);
        ui.heading(egui::RichText::new("🎬 StreamLive").color(widgets::ACCENT).strong());
        ui.label(egui::RichText::new(self.runner.api().server()).small().color(widgets::MUTED));
        ui.separator();

        for section in Section::ALL {
            let active = self.controller.is_menu_item_active(section);
            if ui.selectable_label(active, section.label()).clicked() {
                picked = Some(section);
            }
        }

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            ui.add_space(8.0);
            if ui.button("⚙ Settings").clicked() {
                actions.push(UiAction::OpenModal(Modal::Settings));
            }
        });

        if let Some(section) = picked {
            self.show_section(section.key(), Instant::now());
        }
        actions
    }

    fn show_title(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();
        ui.horizontal(|ui| {
            ui.heading(self.controller.title());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(section) = self.controller.active_section() {
                    if ui.button("🔄").on_hover_text("Refresh").clicked() {
                        actions.push(UiAction::Reload(section));
                    }
                }
                if self.is_busy() {
                    ui.spinner();
                } else if let Some(time) = &self.last_update {
                    ui.label(egui::RichText::new(format!("Updated {}", time)).small().color(widgets::MUTED));
                }
            });
        });
        actions
    }

    fn show_active_section(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let Some(section) = self.controller.active_section() else {
            ui.add_space(20.0);
            widgets::placeholder(
                ui,
                &format!("Section '{}' is not available.", self.controller.current_section()),
            );
            return Vec::new();
        };

        match section {
            // these two manage their own scrolling
            Section::Videos => self.panels.videos.show(ui),
            Section::Logs => {
                self.panels.logs.show(ui);
                Vec::new()
            }
            _ => egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let panels = &mut self.panels;
                    match section {
                        Section::Dashboard => {
                            panels.dashboard.show(ui);
                            Vec::new()
                        }
                        Section::Channels => panels.channels.show(ui),
                        Section::Stats => {
                            panels.stats.show(ui);
                            Vec::new()
                        }
                        Section::Playlists => panels.playlists.show(ui),
                        Section::Scheduler => panels.scheduler.show(ui),
                        Section::Platforms => panels.platforms.show(ui),
                        Section::Analytics => {
                            let api = self.runner.api();
                            panels.analytics.show(ui, api, &panels.channel_options)
                        }
                        Section::Users => panels.users.show(ui),
                        Section::Videos | Section::Logs => Vec::new(),
                    }
                })
                .inner,
        }
    }

    fn show_modal_body(&mut self, modal: Modal, ui: &mut egui::Ui) -> Vec<UiAction> {
        if modal == Modal::Settings {
            return self.show_settings_form(ui);
        }
        let panels = &mut self.panels;
        match modal {
            Modal::AddChannel => panels.channels.show_form(ui),
            Modal::UploadVideo => panels.videos.show_upload_form(ui),
            Modal::DownloadVideo => panels.videos.show_download_form(ui),
            Modal::AddPlaylist => panels.playlists.show_form(ui),
            Modal::AddTask => panels.scheduler.show_form(ui, &panels.channel_options),
            Modal::AddPlatform => panels.platforms.show_form(ui, &panels.channel_options),
            Modal::AddUser => panels.users.show_new_form(ui),
            Modal::EditUser => panels.users.show_edit_form(ui),
            Modal::Settings => Vec::new(),
        }
    }

    fn show_settings_form(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let mut save = false;
        let draft = &mut self.settings;

        ui.heading("⚙ Settings");
        ui.add_space(8.0);
        widgets::text_field(ui, "Server URL", &mut draft.server_url, "http://localhost:5000");
        egui::Grid::new("settings_grid").num_columns(2).spacing([12.0, 6.0]).show(ui, |ui| {
            ui.label("Request timeout (s)");
            ui.add(egui::DragValue::new(&mut draft.request_timeout_secs).range(1..=600));
            ui.end_row();
            ui.label("Dashboard refresh (s)");
            ui.add(egui::DragValue::new(&mut draft.poll.stats_secs).range(1..=3600));
            ui.end_row();
            ui.label("Channels refresh (s)");
            ui.add(egui::DragValue::new(&mut draft.poll.channels_secs).range(1..=3600));
            ui.end_row();
            ui.label("Videos refresh (s)");
            ui.add(egui::DragValue::new(&mut draft.poll.videos_secs).range(1..=3600));
            ui.end_row();
            ui.label("Logs refresh (s)");
            ui.add(egui::DragValue::new(&mut draft.poll.logs_secs).range(1..=3600));
            ui.end_row();
            ui.label("History entries");
            ui.add(egui::DragValue::new(&mut draft.history_limit).range(1..=100));
            ui.end_row();
            ui.label("Font size");
            ui.add(egui::DragValue::new(&mut draft.font_size).range(8..=24));
            ui.end_row();
        });

        let start_label = Section::from_key(&draft.start_section)
            .map(|s| s.label())
            .unwrap_or("Dashboard");
        egui::ComboBox::from_label("Start section")
            .selected_text(start_label)
            .show_ui(ui, |ui| {
                for section in Section::ALL {
                    ui.selectable_value(&mut draft.start_section, section.key().to_string(), section.label());
                }
            });
        egui::ComboBox::from_label("Analytics window")
            .selected_text(format!("Last {} days", draft.analytics_days))
            .show_ui(ui, |ui| {
                for days in analytics::DAY_WINDOWS {
                    ui.selectable_value(&mut draft.analytics_days, days, format!("Last {} days", days));
                }
            });
        ui.checkbox(&mut draft.dark_mode, "🌙 Dark mode");
        ui.label(
            egui::RichText::new("Refresh periods apply after restart.")
                .small()
                .color(widgets::MUTED),
        );

        match widgets::form_buttons(ui, "Save", !draft.server_url.trim().is_empty()) {
            Some(widgets::FormButton::Submit) => save = true,
            Some(widgets::FormButton::Cancel) => actions.push(UiAction::CloseModal(Modal::Settings)),
            None => {}
        }
        if save {
            self.save_settings();
        }
        actions
    }

    fn show_modals(&mut self, ctx: &egui::Context) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let mut backdrop = false;

        for modal in [
            Modal::AddChannel,
            Modal::UploadVideo,
            Modal::DownloadVideo,
            Modal::AddPlaylist,
            Modal::AddTask,
            Modal::AddPlatform,
            Modal::AddUser,
            Modal::EditUser,
            Modal::Settings,
        ] {
            if !self.controller.is_modal_open(modal) {
                continue;
            }
            let response = egui::Modal::new(egui::Id::new(("modal", modal))).show(ctx, |ui| {
                ui.set_width(460.0);
                egui::ScrollArea::vertical()
                    .max_height(560.0)
                    .show(ui, |ui| self.show_modal_body(modal, ui))
                    .inner
            });
            actions.extend(response.inner);
            if response.backdrop_response.clicked() {
                backdrop = true;
            }
        }

        if backdrop {
            self.backdrop_clicked();
        }
        actions
    }

    fn show_confirm(&mut self, ctx: &egui::Context) {
        let Some(confirm) = self.controller.confirm() else {
            return;
        };
        let prompt = confirm.prompt.clone();
        let mut accepted = false;
        let mut cancelled = false;

        egui::Window::new("⚠ Confirm")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_space(10.0);
                ui.label(egui::RichText::new(prompt).strong());
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(egui::RichText::new("OK").color(widgets::RED)).clicked() {
                            accepted = true;
                        }
                    });
                });
            });

        if accepted {
            self.confirm_accepted();
        } else if cancelled {
            self.controller.cancel_confirm();
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.controller.notice() else {
            return;
        };
        let (title, color) = match notice.kind {
            NoticeKind::Success => ("✅ Success", widgets::GREEN),
            NoticeKind::Error => ("❌ Error", widgets::RED),
            NoticeKind::Info => ("ℹ Info", widgets::ACCENT),
        };
        let text = notice.text.clone();
        let mut dismissed = false;

        egui::Window::new(egui::RichText::new(title).color(color))
            .id(egui::Id::new("notice"))
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(280.0);
                ui.add_space(6.0);
                ui.label(text);
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    if ui.button("  OK  ").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.controller.dismiss_notice();
        }
    }
}

impl eframe::App for AdminApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process background task results (non-blocking)
        while let Some(result) = self.runner.try_recv() {
            self.apply_result(result);
        }

        let now = Instant::now();
        self.tick(now);
        self.apply_theme(ctx);

        if self.controller.has_overlay() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.escape();
        }

        let mut actions = Vec::new();

        egui::SidePanel::left("menu_panel")
            .resizable(false)
            .exact_width(200.0)
            .show(ctx, |ui| actions.extend(self.show_menu(ui)));

        egui::TopBottomPanel::top("title_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            actions.extend(self.show_title(ui));
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| actions.extend(self.show_active_section(ui)));

        actions.extend(self.show_modals(ctx));
        self.show_confirm(ctx);
        self.show_notice(ctx);

        for action in actions {
            self.dispatch(action);
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            self.config.analytics_days = self.panels.analytics.days;
            self.config.save();
        }

        if let Some(wait) = self.controller.next_poll_in(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
