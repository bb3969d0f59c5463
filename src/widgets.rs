//! Small egui building blocks shared by the section panels

use eframe::egui;

use crate::format::ProgressLevel;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(102, 126, 234);
pub const GREEN: egui::Color32 = egui::Color32::from_rgb(40, 167, 69);
pub const RED: egui::Color32 = egui::Color32::from_rgb(220, 53, 69);
pub const AMBER: egui::Color32 = egui::Color32::from_rgb(255, 193, 7);
pub const MUTED: egui::Color32 = egui::Color32::from_rgb(130, 130, 130);

/// Rounded pill with coloured text
pub fn badge(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
    egui::Frame::new()
        .fill(color.gamma_multiply(0.2))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).color(color).strong());
        });
}

/// `on`/`off` badge in the status palette
pub fn state_badge(ui: &mut egui::Ui, on: bool, on_text: &str, off_text: &str) {
    if on {
        badge(ui, on_text, GREEN);
    } else {
        badge(ui, off_text, RED);
    }
}

pub fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    let inner = egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner;
    ui.add_space(10.0);
    inner
}

/// Label/value line inside a card
pub fn info_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(label).color(MUTED));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(value);
        });
    });
}

/// Fixed text shown instead of an empty list
pub fn placeholder(ui: &mut egui::Ui, text: &str) {
    ui.add_space(8.0);
    ui.label(egui::RichText::new(text).italics().color(MUTED));
}

pub fn loading(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label("Loading...");
    });
}

/// Big number with a caption underneath
pub fn stat_tile(ui: &mut egui::Ui, caption: &str, value: &str) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_min_width(150.0);
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(value).size(24.0).strong());
                ui.label(egui::RichText::new(caption).color(MUTED));
            });
        });
}

pub fn level_color(level: ProgressLevel) -> egui::Color32 {
    match level {
        ProgressLevel::Success => GREEN,
        ProgressLevel::Warning => AMBER,
        ProgressLevel::Danger => RED,
    }
}

/// Small caption above a form field
pub fn field_label(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).strong());
}

/// Single-line input with a caption
pub fn text_field(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) {
    field_label(ui, label);
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(4.0);
}

/// Submit/Cancel row at the bottom of a modal form
pub enum FormButton {
    Submit,
    Cancel,
}

pub fn form_buttons(ui: &mut egui::Ui, submit_label: &str, submit_enabled: bool) -> Option<FormButton> {
    let mut pressed = None;
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(submit_enabled, egui::Button::new(egui::RichText::new(submit_label).strong()))
            .clicked()
        {
            pressed = Some(FormButton::Submit);
        }
        if ui.button("Cancel").clicked() {
            pressed = Some(FormButton::Cancel);
        }
    });
    pressed
}
