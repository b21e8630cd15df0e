mod config;
mod engine;
mod model;
mod ui;

#[cfg(test)]
mod test_support;

use eframe::egui;
use log::{error, info};

use crate::config::AppConfig;
use crate::engine::llm_client::init_model;
use crate::ui::app::DungeonApp;
use crate::ui::settings_io::load_settings;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings();

    let app = match AppConfig::load() {
        Ok(config) => match init_model(&config.model) {
            Ok(model) => DungeonApp::new(model, &config, settings),
            Err(e) => {
                error!("model loading failed: {e}");
                DungeonApp::fatal(e.to_string(), settings)
            }
        },
        Err(e) => {
            error!("configuration error: {e:#}");
            DungeonApp::fatal(format!("{e:#}"), settings)
        }
    };

    info!("starting UI");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Dungeon Scribe")
            .with_inner_size([1100.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dungeon Scribe",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(app))
        }),
    )
}
