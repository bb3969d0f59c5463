use super::*;
use crate::api::Method;
use crate::models::Section;
use crate::sections::{channels, playlists, videos, ListView};
use crate::tasks::{Container, Loaded};
use crate::testing::{client, FakeTransport};
use std::sync::Arc;

fn app(fake: &Arc<FakeTransport>) -> AdminApp {
    AdminApp::with_api(AppConfig::default(), client(fake), None)
}

/// Applies the next `n` background results
fn pump(app: &mut AdminApp, n: usize) {
    for _ in 0..n {
        match app.runner.recv_timeout(Duration::from_secs(5)) {
            Some(result) => app.apply_result(result),
            None => panic!("background task did not report"),
        }
    }
}

fn valid_channel_form(app: &mut AdminApp) {
    let form = &mut app.panels.channels.form;
    form.name = "Lofi".to_string();
    form.stream_key = "abcd-efgh".to_string();
    form.video_id = Some(5);
    form.video_path = "videos/lofi.mp4".to_string();
}

#[test]
fn test_duplicate_key_keeps_modal_open() {
    let fake = FakeTransport::new();
    fake.route(Method::Get, "/videos", r#"{"videos":[]}"#);
    fake.route(Method::Post, "/channels", r#"{"success":false,"message":"duplicate key"}"#);
    let mut app = app(&fake);

    app.dispatch(UiAction::OpenModal(Modal::AddChannel));
    pump(&mut app, 1);
    valid_channel_form(&mut app);
    let mutation = app.panels.channels.form.submit().unwrap();
    app.dispatch(UiAction::Mutate(mutation));
    pump(&mut app, 1);

    assert_eq!(app.controller().notice(), Some(&Notice::error("duplicate key")));
    assert!(app.controller().is_modal_open(Modal::AddChannel));
    assert!(!app.controller().is_loading(Container::Channels));
    assert_eq!(fake.count(Method::Get, "/channels"), 0);
    // what was typed survives the refusal
    assert_eq!(app.panels().channels.form.name, "Lofi");
}

#[test]
fn test_successful_create_closes_and_reloads() {
    let fake = FakeTransport::new();
    fake.route(Method::Post, "/playlists", r#"{"success":true,"message":"ok"}"#);
    fake.route(
        Method::Get,
        "/playlists",
        r#"{"playlists":[{"id":1,"name":"Night","playback_mode":"shuffle","video_count":2}]}"#,
    );
    let mut app = app(&fake);

    app.dispatch(UiAction::OpenModal(Modal::AddPlaylist));
    app.panels.playlists.form.name = "Night".to_string();
    let mutation = app.panels.playlists.form.submit();
    app.dispatch(UiAction::Mutate(mutation));
    pump(&mut app, 1);

    assert_eq!(app.controller().notice(), Some(&Notice::success("Playlist created successfully!")));
    assert!(!app.controller().is_modal_open(Modal::AddPlaylist));
    assert_eq!(app.panels().playlists.form, playlists::PlaylistForm::default());
    assert!(app.controller().is_loading(Container::Playlists));

    pump(&mut app, 1);
    assert!(!app.controller().is_loading(Container::Playlists));
    assert_eq!(app.panels().playlists.view.as_ref().map(|v| v.items().len()), Some(1));
}

#[test]
fn test_stale_load_is_dropped() {
    let fake = FakeTransport::new();
    let mut app = app(&fake);
    let first = app.controller.issue(Container::Logs);
    let second = app.controller.issue(Container::Logs);

    app.apply_result(TaskResult::Loaded {
        seq: second,
        container: Container::Logs,
        data: Loaded::Logs(vec!["newer".to_string()]),
    });
    app.apply_result(TaskResult::Loaded {
        seq: first,
        container: Container::Logs,
        data: Loaded::Logs(vec!["older".to_string()]),
    });

    assert_eq!(
        app.panels().logs.view,
        Some(ListView::Items(vec!["newer".to_string()]))
    );
}

#[test]
fn test_show_section_loads_its_data() {
    let fake = FakeTransport::new();
    fake.route(Method::Get, "/channels", r#"{"channels":[{"id":1,"name":"A"}]}"#);
    fake.route(Method::Get, "/status", r#"{"channels":[{"id":1,"running":true,"video_exists":true}]}"#);
    let mut app = app(&fake);

    app.show_section("channels", Instant::now());
    assert_eq!(app.controller().title(), "Channels Management");
    assert_eq!(app.controller().running_pollers(), vec![Section::Channels]);
    pump(&mut app, 1);

    let view = app.panels().channels.view.clone().unwrap();
    let card = &view.items()[0];
    assert!(card.streaming);
    assert!(card.can_stop && !card.can_start);
}

#[test]
fn test_unknown_section_issues_nothing() {
    let fake = FakeTransport::new();
    let mut app = app(&fake);
    app.show_section("reports", Instant::now());

    assert_eq!(app.controller().title(), "Dashboard");
    assert_eq!(app.controller().current_section(), "reports");
    assert!(app.runner.recv_timeout(Duration::from_millis(200)).is_none());
    assert!(fake.requests().is_empty());
}

#[test]
fn test_poll_tick_reloads_active_section() {
    let fake = FakeTransport::new();
    fake.route(Method::Get, "/logs", r#"{"logs":["a"]}"#);
    let mut app = app(&fake);
    let start = Instant::now();

    app.show_section("logs", start);
    pump(&mut app, 1);
    app.tick(start + Duration::from_secs(5));
    assert!(!app.controller().is_loading(Container::Logs));

    app.tick(start + Duration::from_secs(11));
    assert!(app.controller().is_loading(Container::Logs));
    pump(&mut app, 1);
    assert_eq!(fake.count(Method::Get, "/logs"), 2);
}

#[test]
fn test_confirmed_stop_all() {
    let fake = FakeTransport::new();
    fake.route(Method::Post, "/stop-all", r#"{"success":true,"message":"Stopped 2 streams"}"#);
    fake.route(Method::Get, "/channels", r#"{"channels":[]}"#);
    fake.route(Method::Get, "/status", r#"{"channels":[]}"#);
    let mut app = app(&fake);

    app.dispatch(channels::stop_all());
    assert!(app.controller().confirm().is_some());
    assert!(fake.requests().is_empty());

    app.confirm_accepted();
    pump(&mut app, 2);
    assert_eq!(fake.count(Method::Post, "/stop-all"), 1);
    assert_eq!(app.controller().notice(), Some(&Notice::success("Stopped 2 streams")));
    assert_eq!(app.panels().channels.view, Some(ListView::Empty(channels::PLACEHOLDER)));
}

#[test]
fn test_cancelled_confirm_sends_nothing() {
    let fake = FakeTransport::new();
    let mut app = app(&fake);
    app.dispatch(channels::delete(4));
    app.escape();
    assert!(app.controller().confirm().is_none());
    app.confirm_accepted();
    assert!(fake.requests().is_empty());
}

#[test]
fn test_selected_video_fills_path() {
    let fake = FakeTransport::new();
    fake.route(Method::Get, "/videos/12", r#"{"video":{"id":12,"title":"Loop","file_path":"videos/loop.mp4"}}"#);
    let mut app = app(&fake);

    app.dispatch(UiAction::SelectVideo(Some(12)));
    pump(&mut app, 1);
    assert_eq!(app.controller().selected_video_id(), Some(12));
    assert_eq!(app.panels().channels.form.video_path, "videos/loop.mp4");
}

#[test]
fn test_escape_discards_typed_input() {
    let fake = FakeTransport::new();
    let mut app = app(&fake);

    app.dispatch(UiAction::OpenModal(Modal::AddUser));
    app.panels.users.new_form.username = "ops".to_string();
    app.escape();

    assert!(!app.controller().has_overlay());
    assert!(app.panels().users.new_form.username.is_empty());
}

#[test]
fn test_add_task_fills_channel_picker() {
    let fake = FakeTransport::new();
    fake.route(Method::Get, "/channels", r#"{"channels":[{"id":3,"name":"News"}]}"#);
    let mut app = app(&fake);

    app.dispatch(UiAction::OpenModal(Modal::AddTask));
    pump(&mut app, 1);
    assert_eq!(app.panels().channel_options.len(), 1);
    assert_eq!(app.panels().channel_options[0].name, "News");
}

#[test]
fn test_failed_upload_keeps_form() {
    let fake = FakeTransport::new();
    let mut app = app(&fake);
    app.dispatch(UiAction::OpenModal(Modal::UploadVideo));
    app.panels.videos.upload.title = "Clip".to_string();

    app.apply_result(TaskResult::Uploaded(crate::api::ApiResponse::failed("Upload error!")));

    assert_eq!(app.controller().notice(), Some(&Notice::error("Upload error!")));
    assert!(app.controller().is_modal_open(Modal::UploadVideo));
    assert_eq!(app.panels().videos.upload.title, "Clip");
}

#[test]
fn test_reversed_dates_send_no_create_request() {
    let fake = FakeTransport::new();
    fake.route(Method::Get, "/videos", r#"{"videos":[]}"#);
    let mut app = app(&fake);

    app.dispatch(UiAction::OpenModal(Modal::AddChannel));
    pump(&mut app, 1);
    valid_channel_form(&mut app);
    app.panels.channels.form.start_date = "2024-05-02".to_string();
    app.panels.channels.form.end_date = "2024-05-01".to_string();
    let action = channels::submit_action(&app.panels().channels.form);
    app.dispatch(action);

    assert_eq!(
        app.controller().notice(),
        Some(&Notice::error("Start date cannot be greater than end date!"))
    );
    assert!(app.controller().is_modal_open(Modal::AddChannel));
    assert!(app.runner.recv_timeout(Duration::from_millis(200)).is_none());
    assert_eq!(fake.count(Method::Post, "/channels"), 0);
}

#[test]
fn test_oversized_file_opens_no_upload() {
    let fake = FakeTransport::new();
    let mut app = app(&fake);

    app.dispatch(UiAction::OpenModal(Modal::UploadVideo));
    app.panels.videos.upload.title = "Marathon".to_string();
    app.panels.videos.upload.file = Some(videos::PickedFile {
        path: "/media/marathon.mkv".into(),
        size: crate::api::MAX_UPLOAD_BYTES + 1,
    });
    let action = app.panels().videos.upload.submit_action();
    app.dispatch(action);

    assert_eq!(app.controller().notice(), Some(&Notice::error("File too large! Maximum 2GB")));
    assert!(app.controller().is_modal_open(Modal::UploadVideo));
    assert!(!app.panels().videos.upload.in_flight);
    assert!(app.runner.recv_timeout(Duration::from_millis(200)).is_none());
    assert_eq!(fake.count(Method::Post, "/videos/upload"), 0);
}
