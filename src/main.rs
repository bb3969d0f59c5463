//! StreamLive Admin - Rust Edition
//! A cross-platform admin console for the StreamLive stream manager

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::time::Instant;

use clap::Parser;
use eframe::egui;

mod api;
mod app;
mod config;
mod controller;
mod format;
mod models;
mod sections;
mod tasks;
#[cfg(test)]
mod testing;
mod widgets;

use app::AdminApp;
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "streamlive-admin", version, about = "StreamLive stream manager console")]
struct Args {
    /// Backend base URL, e.g. http://localhost:5000
    #[arg(long, env = "STREAMLIVE_SERVER")]
    server: Option<String>,

    /// Section shown at startup (dashboard, channels, videos, ...)
    #[arg(long)]
    section: Option<String>,
}

/// Window icon: purple rounded square with a play triangle and a live dot
fn load_icon() -> egui::IconData {
    let size: usize = 64;
    let mut rgba = vec![0u8; size * size * 4];

    for y in 0..size {
        for x in 0..size {
            let idx = (y * size + x) * 4;

            let nx = x as f32 / size as f32;
            let ny = y as f32 / size as f32;

            let corner_radius = 0.125;
            let in_rounded_rect = {
                let dx = if nx < corner_radius { corner_radius - nx }
                         else if nx > 1.0 - corner_radius { nx - (1.0 - corner_radius) }
                         else { 0.0 };
                let dy = if ny < corner_radius { corner_radius - ny }
                         else if ny > 1.0 - corner_radius { ny - (1.0 - corner_radius) }
                         else { 0.0 };
                dx * dx + dy * dy <= corner_radius * corner_radius
            };

            if !in_rounded_rect {
                continue;
            }

            // Purple gradient background (#667eea to #764ba2)
            let gradient_t = nx * 0.5 + ny * 0.5;
            let r = (102.0 + (118.0 - 102.0) * gradient_t) as u8;
            let g = (126.0 + (75.0 - 126.0) * gradient_t) as u8;
            let b = (234.0 + (162.0 - 234.0) * gradient_t) as u8;

            let in_play = {
                let px = nx - 0.32;
                let py = ny - 0.5;
                px >= 0.0 && px <= 0.36 && py.abs() <= (0.36 - px) * 0.7
            };

            let in_live_dot = {
                let dx = nx - 0.78;
                let dy = ny - 0.22;
                dx * dx + dy * dy <= 0.01
            };

            let (r, g, b) = if in_live_dot {
                (220, 53, 69)
            } else if in_play {
                (255, 255, 255)
            } else {
                (r, g, b)
            };
            rgba[idx] = r;
            rgba[idx + 1] = g;
            rgba[idx + 2] = b;
            rgba[idx + 3] = 255;
        }
    }

    egui::IconData {
        rgba,
        width: size as u32,
        height: size as u32,
    }
}

/// Adds the platform's colour emoji font behind the default fonts
fn install_emoji_font(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    #[cfg(target_os = "windows")]
    let emoji_paths: &[&str] = &["C:\\Windows\\Fonts\\seguiemj.ttf"];

    #[cfg(target_os = "linux")]
    let emoji_paths: &[&str] = &[
        "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
        "/usr/share/fonts/noto-emoji/NotoColorEmoji.ttf",
        "/usr/share/fonts/google-noto-emoji/NotoColorEmoji.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ];

    #[cfg(target_os = "macos")]
    let emoji_paths: &[&str] = &["/System/Library/Fonts/Apple Color Emoji.ttc"];

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    let emoji_paths: &[&str] = &[];

    for path in emoji_paths {
        if let Ok(font_data) = std::fs::read(path) {
            log::debug!("Emoji font: {}", path);
            fonts.font_data.insert(
                "emoji".to_owned(),
                egui::FontData::from_owned(font_data).into(),
            );
            fonts.families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .push("emoji".to_owned());
            break;
        }
    }

    ctx.set_fonts(fonts);
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = AppConfig::load();
    if let Some(server) = args.server {
        config.server_url = server;
    }
    let start_section = args.section.unwrap_or_else(|| config.start_section.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1250.0, 700.0])
            .with_min_inner_size([900.0, 550.0])
            .with_icon(load_icon()),
        vsync: true,
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        ..Default::default()
    };

    eframe::run_native(
        "StreamLive Admin",
        options,
        Box::new(move |cc| {
            install_emoji_font(&cc.egui_ctx);
            cc.egui_ctx.set_visuals(egui::Visuals::dark());

            let mut app = AdminApp::new(config, Some(cc.egui_ctx.clone()));
            app.show_section(&start_section, Instant::now());
            Ok(Box::new(app))
        }),
    )
}
