mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod view;

use app::DataSweeperApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {e:#}");
        AppConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Sweeper",
        options,
        Box::new(|_cc| Ok(Box::new(DataSweeperApp::new(config)))),
    )
}
