#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use agency_timeline::app::TimelineApp;
use agency_timeline::config::AppSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> eframe::Result<()> {
    let settings_path = AppSettings::default_path();
    let (settings, problem) = AppSettings::load_or_default(&settings_path);
    init_tracing(&settings.log_filter);
    tracing::info!(settings = %settings_path.display(), "starting agency timeline");
    if let Some(e) = problem {
        tracing::warn!(path = %settings_path.display(), error = %e, "ignoring invalid settings");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Agency Timeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Agency Timeline",
        options,
        Box::new(move |cc| Ok(Box::new(TimelineApp::new(cc, settings, settings_path)))),
    )
}
