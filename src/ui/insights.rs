use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use nutrition_paradox::query::{Catalog, QueryId, QueryResult};

use super::charts::{bar_series, line_series};
use crate::color::generate_palette;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Analytical insights (central panel)
// ---------------------------------------------------------------------------

/// Render the catalog tabs, the label selector, and the current result.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for catalog in Catalog::ALL {
            ui.selectable_value(&mut state.catalog, catalog, catalog.title());
        }
    });
    ui.separator();

    let catalog = state.catalog;
    ui.heading(match catalog {
        Catalog::Combined => "Combined Insights".to_string(),
        other => format!("{} Insights", other.title()),
    });

    let current = state.selected_query(catalog);
    let mut picked = current;
    egui::ComboBox::from_id_salt(("query_select", catalog.name()))
        .selected_text(current.label())
        .width(420.0)
        .show_ui(ui, |ui: &mut Ui| {
            for q in catalog.queries() {
                ui.selectable_value(&mut picked, q, q.label());
            }
        });

    if picked != current {
        state.select_query(picked);
    } else {
        state.ensure_query_current();
    }

    if ui.button("Re-run").clicked() {
        state.run_query(picked);
    }
    ui.separator();

    let Some((id, outcome)) = &state.outcome else {
        return;
    };

    if let Some(err) = &outcome.error {
        ui.label(RichText::new(format!("Query failed: {err}")).color(Color32::RED));
    }

    ui.push_id(("result_table", id.label()), |ui: &mut Ui| {
        result_table(ui, &outcome.table);
    });

    if !outcome.table.is_empty() {
        ui.separator();
        result_chart(ui, *id, &outcome.table);
    }
}

fn result_table(ui: &mut Ui, table: &QueryResult) {
    if table.columns.is_empty() {
        ui.label("No data.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(260.0)
        .columns(Column::auto().at_least(80.0), table.columns.len())
        .header(20.0, |mut header| {
            for name in &table.columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.rows.len(), |mut row| {
                let cells = &table.rows[row.index()];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}

/// Bar chart for the single-table catalogs, one line per value column for
/// the combined catalog.
fn result_chart(ui: &mut Ui, id: QueryId, table: &QueryResult) {
    let plot = Plot::new(("result_chart", id.label()))
        .legend(Legend::default())
        .x_axis_label(table.columns[0].clone());

    match id.catalog() {
        Catalog::Obesity | Catalog::Malnutrition => {
            let Some(series) = bar_series(table) else {
                return;
            };
            let color = generate_palette(1)[0];
            let bars: Vec<Bar> = series
                .into_iter()
                .enumerate()
                .map(|(i, (label, value))| Bar::new(i as f64, value).name(label).fill(color))
                .collect();
            let name = table.columns[1].clone();
            plot.show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color).name(name));
            });
        }
        Catalog::Combined => {
            let series = line_series(table);
            if series.is_empty() {
                return;
            }
            let palette = generate_palette(series.len());
            plot.show(ui, |plot_ui| {
                for ((name, points), color) in series.into_iter().zip(palette) {
                    let points: PlotPoints = points.into_iter().collect();
                    plot_ui.line(Line::new(points).name(name).color(color).width(1.5));
                }
            });
        }
    }
}
