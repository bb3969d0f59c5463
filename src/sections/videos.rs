//! Video library: list, upload, Google Drive download, local scan

use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;
use serde_json::json;

use super::{ListView, Outcome, UiAction};
use crate::api::{ApiClient, ApiResponse, MAX_UPLOAD_BYTES};
use crate::controller::{Modal, Notice};
use crate::format;
use crate::models::{Section, Video, VideoList};
use crate::tasks::{Mutation, Origin, UploadJob};
use crate::widgets;

pub const PLACEHOLDER: &str = "No videos yet. Add your first video!";

/// Wait before re-reading the library after a Drive download was queued
pub const GDRIVE_RELOAD_DELAY: Duration = Duration::from_secs(2);

pub fn load(api: &ApiClient) -> Vec<Video> {
    let list: VideoList = api.get_as("/videos");
    list.videos
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoRow {
    pub id: i64,
    pub title: String,
    pub detail: String,
}

pub fn build(videos: &[Video]) -> ListView<VideoRow> {
    let rows = videos
        .iter()
        .map(|video| {
            let duration = video
                .duration_formatted
                .clone()
                .unwrap_or_else(|| format::format_clip_duration(video.duration_seconds));
            let mut detail = format!(
                "{} • {} • {} MB",
                video.resolution.as_deref().unwrap_or("Unknown"),
                duration,
                video.file_size_mb
            );
            if video.usage_count > 0 {
                detail.push_str(&format!(" • Used {}x", video.usage_count));
            }
            VideoRow {
                id: video.id,
                title: video.title.clone(),
                detail,
            }
        })
        .collect();
    ListView::new(rows, PLACEHOLDER)
}

/// Entry in the add-channel library picker
#[derive(Debug, Clone, PartialEq)]
pub struct VideoOption {
    pub id: i64,
    pub label: String,
}

pub fn options(videos: &[Video]) -> Vec<VideoOption> {
    videos
        .iter()
        .map(|v| VideoOption {
            id: v.id,
            label: format!("{} ({}MB)", v.title, v.file_size_mb),
        })
        .collect()
}

pub fn delete(id: i64) -> UiAction {
    UiAction::Confirm {
        prompt: "Delete this video? This action cannot be undone!".to_string(),
        mutation: Mutation::delete(Origin::DeleteVideo, format!("/videos/{}", id)),
    }
}

pub fn scan() -> UiAction {
    UiAction::Confirm {
        prompt: "Scan ./videos folder for unregistered videos?".to_string(),
        mutation: Mutation::post(Origin::ScanVideos, "/videos/scan", json!({})),
    }
}

pub fn outcome(origin: Origin, response: &ApiResponse) -> Outcome {
    match origin {
        Origin::DownloadGdrive => {
            // the download continues server-side; look again shortly
            Outcome::notice(Notice::from_outcome(response.success, response.message.clone()))
                .close(Modal::DownloadVideo)
                .reload(Section::Videos)
                .delayed(GDRIVE_RELOAD_DELAY)
        }
        Origin::ScanVideos if response.success => Outcome::notice(Notice::success(format!(
            "{}\n\nFound: {} videos\nAdded: {} new videos",
            response.message,
            response.count("found"),
            response.count("added")
        )))
        .reload(Section::Videos),
        Origin::ScanVideos => Outcome::notice(Notice::error(response.message.clone())),
        _ => Outcome::notice(Notice::from_outcome(response.success, response.message.clone()))
            .reload(Section::Videos),
    }
}

pub fn upload_outcome(response: &ApiResponse) -> Outcome {
    if response.success {
        Outcome::notice(Notice::success(response.message.clone()))
            .close(Modal::UploadVideo)
            .reload(Section::Videos)
    } else {
        Outcome::notice(Notice::error(response.message.clone()))
    }
}

/// File chosen in the upload dialog
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub path: PathBuf,
    pub size: u64,
}

impl PickedFile {
    pub fn from_path(path: PathBuf) -> Result<Self, String> {
        let size = std::fs::metadata(&path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?
            .len();
        Ok(Self { path, size })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadForm {
    pub title: String,
    pub file: Option<PickedFile>,
    pub progress: Option<(u64, u64)>,
    pub in_flight: bool,
}

impl UploadForm {
    pub fn submit(&self) -> Result<UploadJob, String> {
        let Some(file) = &self.file else {
            return Err("Please select a video file!".to_string());
        };
        if file.size > MAX_UPLOAD_BYTES {
            return Err("File too large! Maximum 2GB".to_string());
        }
        Ok(UploadJob {
            title: self.title.trim().to_string(),
            path: file.path.clone(),
            size: file.size,
        })
    }

    /// Upload to start, or the notice explaining why not
    pub fn submit_action(&self) -> UiAction {
        match self.submit() {
            Ok(job) => UiAction::Upload(job),
            Err(message) => UiAction::Notify(Notice::error(message)),
        }
    }

    pub fn percent(&self) -> Option<u8> {
        self.progress.map(|(sent, total)| {
            if total == 0 {
                100
            } else {
                ((sent as f64 / total as f64) * 100.0).round().min(100.0) as u8
            }
        })
    }

    pub fn status(&self) -> Option<String> {
        self.progress.map(|(sent, total)| {
            format!("Uploading... {} MB / {} MB", format::format_mb(sent), format::format_mb(total))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadForm {
    pub title: String,
    pub filename: String,
    pub gdrive_file_id: String,
}

impl DownloadForm {
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.filename.trim().is_empty()
            && !self.gdrive_file_id.trim().is_empty()
    }

    pub fn submit(&self) -> Mutation {
        Mutation::post(
            Origin::DownloadGdrive,
            "/videos/download-gdrive",
            json!({
                "title": self.title.trim(),
                "filename": self.filename.trim(),
                "gdrive_file_id": self.gdrive_file_id.trim(),
            }),
        )
    }
}

#[derive(Default)]
pub struct VideosPanel {
    pub view: Option<ListView<VideoRow>>,
    pub upload: UploadForm,
    pub download: DownloadForm,
}

impl VideosPanel {
    pub fn apply(&mut self, videos: &[Video]) {
        self.view = Some(build(videos));
    }

    pub fn reset_upload(&mut self) {
        // an upload in progress keeps reporting into the form
        if !self.upload.in_flight {
            self.upload = UploadForm::default();
        }
    }

    pub fn upload_started(&mut self) {
        self.upload.in_flight = true;
        self.upload.progress = Some((0, self.upload.file.as_ref().map(|f| f.size).unwrap_or(0)));
    }

    pub fn upload_progress(&mut self, sent: u64, total: u64) {
        self.upload.progress = Some((sent, total));
    }

    pub fn upload_finished(&mut self, success: bool) {
        self.upload.in_flight = false;
        if success {
            self.upload = UploadForm::default();
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            if ui.button("⬆ Upload Video").clicked() {
                actions.push(UiAction::OpenModal(Modal::UploadVideo));
            }
            if ui.button("☁ Google Drive").clicked() {
                actions.push(UiAction::OpenModal(Modal::DownloadVideo));
            }
            if ui.button("🔍 Scan Local").clicked() {
                actions.push(scan());
            }
            if ui.button("🔄 Refresh").clicked() {
                actions.push(UiAction::Reload(Section::Videos));
            }
        });
        ui.add_space(10.0);

        let Some(view) = &self.view else {
            widgets::loading(ui);
            return actions;
        };

        match view {
            ListView::Empty(text) => widgets::placeholder(ui, text),
            ListView::Items(rows) => {
                egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    for row in rows {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.label(egui::RichText::new(&row.title).strong());
                                ui.label(egui::RichText::new(&row.detail).small().color(widgets::MUTED));
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.button("🗑").on_hover_text("Delete video").clicked() {
                                    actions.push(delete(row.id));
                                }
                            });
                        });
                        ui.separator();
                    }
                });
            }
        }
        actions
    }

    pub fn show_upload_form(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let form = &mut self.upload;

        ui.heading("⬆ Upload Video");
        ui.add_space(8.0);
        widgets::text_field(ui, "Title", &mut form.title, "Video title");

        widgets::field_label(ui, "File");
        ui.horizontal(|ui| {
            let picked = form
                .file
                .as_ref()
                .map(|f| format!("{} ({} MB)", f.path.display(), format::format_mb(f.size)))
                .unwrap_or_else(|| "No file selected".to_string());
            ui.label(picked);
            if ui.add_enabled(!form.in_flight, egui::Button::new("📁 Browse")).clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_title("Select Video")
                    .add_filter("Video", &["mp4", "mkv", "avi", "mov", "flv", "webm"])
                    .pick_file()
                {
                    match PickedFile::from_path(path) {
                        Ok(file) => form.file = Some(file),
                        Err(message) => actions.push(UiAction::Notify(Notice::error(message))),
                    }
                }
            }
        });

        if let (Some(percent), Some(status)) = (form.percent(), form.status()) {
            ui.add_space(6.0);
            ui.add(egui::ProgressBar::new(percent as f32 / 100.0).text(format!("{}%", percent)));
            ui.label(status);
        }

        match widgets::form_buttons(ui, "Upload", !form.in_flight) {
            Some(widgets::FormButton::Submit) => actions.push(form.submit_action()),
            Some(widgets::FormButton::Cancel) => actions.push(UiAction::CloseModal(Modal::UploadVideo)),
            None => {}
        }
        actions
    }

    pub fn show_download_form(&mut self, ui: &mut egui::Ui) -> Vec<UiAction> {
        let mut actions = Vec::new();
        let form = &mut self.download;

        ui.heading("☁ Download from Google Drive");
        ui.add_space(8.0);
        widgets::text_field(ui, "Title", &mut form.title, "Video title");
        widgets::text_field(ui, "Filename", &mut form.filename, "video.mp4");
        widgets::text_field(ui, "Google Drive File ID", &mut form.gdrive_file_id, "1AbC...");

        match widgets::form_buttons(ui, "Download", form.is_complete()) {
            Some(widgets::FormButton::Submit) => actions.push(UiAction::Mutate(form.submit())),
            Some(widgets::FormButton::Cancel) => actions.push(UiAction::CloseModal(Modal::DownloadVideo)),
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

    fn video(id: i64, title: &str) -> Video {
        Video {
            id,
            title: title.to_string(),
            file_size_mb: 12.5,
            duration_formatted: Some("2m 5s".to_string()),
            resolution: Some("1920x1080".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_library_placeholder() {
        let fake = FakeTransport::new();
        fake.route(Method::Get, "/videos", r#"{"videos":[]}"#);
        let videos = load(&client(&fake));
        assert_eq!(build(&videos), ListView::Empty("No videos yet. Add your first video!"));
    }

    #[test]
    fn test_row_detail() {
        let mut used = video(2, "Promo");
        used.usage_count = 3;
        let mut bare = video(3, "Raw");
        bare.resolution = None;
        bare.duration_formatted = None;
        bare.duration_seconds = 42;

        let view = build(&[video(1, "Intro"), used, bare]);
        let rows = view.items();
        assert_eq!(rows[0].detail, "1920x1080 • 2m 5s • 12.5 MB");
        assert_eq!(rows[1].detail, "1920x1080 • 2m 5s • 12.5 MB • Used 3x");
        assert_eq!(rows[2].detail, "Unknown • 42s • 12.5 MB");
    }

    #[test]
    fn test_build_is_idempotent() {
        let videos = vec![video(1, "Intro"), video(2, "Outro")];
        assert_eq!(build(&videos), build(&videos));
    }

    #[test]
    fn test_picker_labels() {
        let opts = options(&[video(7, "Intro")]);
        assert_eq!(opts, vec![VideoOption { id: 7, label: "Intro (12.5MB)".to_string() }]);
    }

    #[test]
    fn test_upload_requires_file() {
        let form = UploadForm { title: "Clip".to_string(), ..Default::default() };
        assert_eq!(form.submit(), Err("Please select a video file!".to_string()));
    }

    #[test]
    fn test_upload_over_ceiling_is_blocked() {
        let form = UploadForm {
            title: "Huge".to_string(),
            file: Some(PickedFile { path: PathBuf::from("/tmp/huge.mp4"), size: MAX_UPLOAD_BYTES + 1 }),
            ..Default::default()
        };
        assert_eq!(form.submit(), Err("File too large! Maximum 2GB".to_string()));
    }

    #[test]
    fn test_upload_at_ceiling_is_allowed() {
        let form = UploadForm {
            title: " Edge ".to_string(),
            file: Some(PickedFile { path: PathBuf::from("/tmp/edge.mp4"), size: MAX_UPLOAD_BYTES }),
            ..Default::default()
        };
        let job = form.submit().unwrap();
        assert_eq!(job.title, "Edge");
        assert_eq!(job.size, MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_upload_status_text() {
        let form = UploadForm {
            progress: Some((1024 * 1024, 4 * 1024 * 1024)),
            ..Default::default()
        };
        assert_eq!(form.percent(), Some(25));
        assert_eq!(form.status().unwrap(), "Uploading... 1.00 MB / 4.00 MB");
    }

    #[test]
    fn test_scan_outcome_reports_counts() {
        let response = ApiResponse::from_value(json!({
            "success": true, "message": "Scan complete", "found": 5, "added": 2
        }));
        let outcome = outcome(Origin::ScanVideos, &response);
        assert_eq!(
            outcome.notice.text,
            "Scan complete\n\nFound: 5 videos\nAdded: 2 new videos"
        );
        assert_eq!(outcome.reload, Some(Section::Videos));

        let failed = super::outcome(Origin::ScanVideos, &ApiResponse::failed("Folder not found"));
        assert_eq!(failed.notice, Notice::error("Folder not found"));
        assert_eq!(failed.reload, None);
    }

    #[test]
    fn test_gdrive_reload_is_delayed() {
        let response = ApiResponse::from_value(json!({"success": true, "message": "Download started"}));
        let outcome = outcome(Origin::DownloadGdrive, &response);
        assert_eq!(outcome.close, Some(Modal::DownloadVideo));
        assert_eq!(outcome.reload, Some(Section::Videos));
        assert_eq!(outcome.reload_delay, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_download_body() {
        let form = DownloadForm {
            title: "Promo".into(),
            filename: "promo.mp4".into(),
            gdrive_file_id: "1AbC".into(),
        };
        assert!(form.is_complete());
        let mutation = form.submit();
        assert_eq!(mutation.path, "/videos/download-gdrive");
        assert_eq!(
            mutation.body,
            Some(json!({"title": "Promo", "filename": "promo.mp4", "gdrive_file_id": "1AbC"}))
        );
    }

    #[test]
    fn test_upload_outcome() {
        let ok = upload_outcome(&ApiResponse { success: true, message: "Uploaded".into(), raw: json!({}) });
        assert_eq!(ok.close, Some(Modal::UploadVideo));
        let bad = upload_outcome(&ApiResponse::failed("Upload failed"));
        assert_eq!(bad.close, None);
        assert_eq!(bad.notice, Notice::error("Upload failed"));
    }
}
