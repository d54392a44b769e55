mod app;
mod color;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use eframe::egui;

use app::NutritionApp;
use nutrition_paradox::config::AppConfig;
use nutrition_paradox::data::loader::load_store;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load().context("loading configuration")?;
    let store = match load_store(&config) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to load datasets: {e}");
            return Err(e).context("loading datasets");
        }
    };
    log::info!("Analytical queries use store {}", config.store_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Nutrition Paradox – Obesity vs Malnutrition",
        options,
        Box::new(|_cc| Ok(Box::new(NutritionApp::new(config, store)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
