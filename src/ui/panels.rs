use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use nutrition_paradox::data::loader::load_store;

use crate::state::{AppState, MainView};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Options come from the obesity dataset; they apply to both.
    let regions: Vec<String> = state.store.obesity.regions.iter().cloned().collect();
    let (year_min, year_max) = state.store.obesity.year_bounds.unwrap_or((0, 0));

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Regions ----
            let header_text = format!(
                "Region(s)  ({}/{})",
                state.selection.regions.len(),
                regions.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("regions")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_regions();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_regions();
                        }
                    });

                    for region in &regions {
                        let mut checked = state.selection.regions.contains(region);
                        if ui.checkbox(&mut checked, region.as_str()).changed() {
                            state.toggle_region(region);
                        }
                    }
                });
            ui.separator();

            // ---- Year range ----
            ui.strong("Year range");
            let (mut from, mut to) = state.selection.year_range;
            let from_changed = ui
                .add(Slider::new(&mut from, year_min..=year_max).text("from"))
                .changed();
            let to_changed = ui
                .add(Slider::new(&mut to, year_min..=year_max).text("to"))
                .changed();
            if from_changed || to_changed {
                state.set_year_range(from, to);
            }
            if from > to {
                ui.label(RichText::new("Empty range").color(Color32::YELLOW));
            }
            ui.separator();

            // ---- Country search ----
            ui.strong("Search country");
            if ui.text_edit_singleline(&mut state.country_input).changed() {
                state.apply_country_search();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Reload data…").clicked() {
                reload_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.main_view, MainView::Explore, "Visual Exploration");
        ui.selectable_value(&mut state.main_view, MainView::Insights, "Analytical Insights");

        ui.separator();

        ui.label(format!(
            "obesity {}/{} · malnutrition {}/{} records visible",
            state.exploration.visible_obesity,
            state.store.obesity.len(),
            state.exploration.visible_malnutrition,
            state.store.malnutrition.len(),
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Reload dialog
// ---------------------------------------------------------------------------

/// Pick a directory holding both dataset files and replace the store.
pub fn reload_dialog(state: &mut AppState) {
    let Some(dir) = rfd::FileDialog::new()
        .set_title("Open nutrition data directory")
        .pick_folder()
    else {
        return;
    };

    let config = state.config.with_data_dir(&dir);
    match load_store(&config) {
        Ok(store) => {
            log::info!("Reloaded datasets from {}", dir.display());
            state.config = config;
            state.set_store(store);
        }
        Err(e) => {
            log::error!("Failed to reload data: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
