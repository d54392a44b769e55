use eframe::egui;

use nutrition_paradox::config::AppConfig;
use nutrition_paradox::data::model::DatasetStore;

use crate::state::{AppState, MainView};
use crate::ui::{explore, insights, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct NutritionApp {
    pub state: AppState,
}

impl NutritionApp {
    pub fn new(config: AppConfig, store: DatasetStore) -> Self {
        Self {
            state: AppState::new(config, store),
        }
    }
}

impl eframe::App for NutritionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + view mode ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: exploration or insights ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.main_view {
            MainView::Explore => explore::show(ui, &mut self.state),
            MainView::Insights => insights::show(ui, &mut self.state),
        });
    }
}
