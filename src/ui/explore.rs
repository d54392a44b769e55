use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points,
};

use nutrition_paradox::data::aggregate::YearMean;
use nutrition_paradox::data::model::{DatasetKind, Record};

use super::charts::{five_number, group_by_region};
use crate::color::{kind_color, ColorMap};
use crate::state::{AppState, Exploration, ExploreTab};

// ---------------------------------------------------------------------------
// Visual exploration (central panel)
// ---------------------------------------------------------------------------

/// Render the four visual-exploration tabs.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in ExploreTab::ALL {
            ui.selectable_value(&mut state.explore_tab, tab, tab.title());
        }
    });
    ui.separator();

    let data = &state.exploration;
    match state.explore_tab {
        ExploreTab::Trends => trends(ui, data),
        ExploreTab::Comparisons => comparisons(ui, data),
        ExploreTab::Distributions => distributions(ui, data),
        ExploreTab::Paradox => paradox(ui, data),
    }
}

fn trend_points(trend: &[YearMean]) -> Vec<[f64; 2]> {
    trend
        .iter()
        .map(|t| [t.year as f64, t.mean_estimate])
        .collect()
}

fn trends(ui: &mut Ui, data: &Exploration) {
    ui.heading("Obesity vs Malnutrition Over Time");

    let series = [
        (DatasetKind::Obesity, trend_points(&data.obesity_trend)),
        (DatasetKind::Malnutrition, trend_points(&data.malnutrition_trend)),
    ];

    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Mean Estimate (%)")
        .show(ui, |plot_ui| {
            for (kind, points) in series {
                let color = kind_color(kind);
                let name = kind.to_string();
                let line_points: PlotPoints = points.iter().copied().collect();
                let markers: PlotPoints = points.iter().copied().collect();
                plot_ui.line(Line::new(line_points).name(&name).color(color).width(2.0));
                plot_ui.points(Points::new(markers).name(&name).color(color).radius(3.0));
            }
        });
}

fn comparisons(ui: &mut Ui, data: &Exploration) {
    let Some(year) = data.top_year else {
        ui.label("No records match the current filters.");
        return;
    };
    ui.heading(format!("Top 10 Countries ({year})"));

    ui.columns(2, |cols| {
        top_bar_chart(
            &mut cols[0],
            "top_obesity",
            "Top 10 Obesity Rates",
            &data.top_obesity,
            kind_color(DatasetKind::Obesity),
        );
        top_bar_chart(
            &mut cols[1],
            "top_malnutrition",
            "Top 10 Malnutrition Rates",
            &data.top_malnutrition,
            kind_color(DatasetKind::Malnutrition),
        );
    });
}

fn top_bar_chart(ui: &mut Ui, id: &str, title: &str, records: &[Record], color: Color32) {
    ui.strong(title);
    // Highest bar on top.
    let n = records.len();
    let bars: Vec<Bar> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new((n - i) as f64, r.mean_estimate.unwrap_or_default())
                .name(&r.country)
                .fill(color)
        })
        .collect();

    Plot::new(id)
        .x_axis_label("Mean Estimate (%)")
        .show_y(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(color).name(title));
        });
}

fn distributions(ui: &mut Ui, data: &Exploration) {
    ui.heading("Distribution by Region");

    let groups = group_by_region(&data.distribution);
    if groups.is_empty() {
        ui.label("No records match the current filters.");
        return;
    }

    let mut boxes: BTreeMap<DatasetKind, Vec<BoxElem>> = BTreeMap::new();
    for (i, (region, by_kind)) in groups.iter().enumerate() {
        for (kind, values) in by_kind {
            let Some(stats) = five_number(values) else {
                continue;
            };
            let offset = match kind {
                DatasetKind::Obesity => -0.2,
                DatasetKind::Malnutrition => 0.2,
            };
            let spread = BoxSpread::new(stats.min, stats.q1, stats.median, stats.q3, stats.max);
            let color = kind_color(*kind);
            boxes.entry(*kind).or_default().push(
                BoxElem::new(i as f64 + offset, spread)
                    .name(format!("{region} – {kind}"))
                    .box_width(0.35)
                    .fill(color.gamma_multiply(0.3))
                    .stroke((1.5, color)),
            );
        }
    }

    Plot::new("distribution_plot")
        .legend(Legend::default())
        .y_axis_label("Mean Estimate (%)")
        .show(ui, |plot_ui| {
            for (kind, elems) in boxes {
                plot_ui.box_plot(
                    BoxPlot::new(elems)
                        .name(kind.to_string())
                        .color(kind_color(kind)),
                );
            }
        });

    // Regions sit at integer x positions; list them for reference.
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (i, region) in groups.keys().enumerate() {
            ui.label(format!("{i}: {region}"));
        }
    });
}

fn paradox(ui: &mut Ui, data: &Exploration) {
    ui.heading("Obesity vs Malnutrition Correlation");

    if data.paired.is_empty() {
        ui.label("No country/year pairs present in both datasets.");
        return;
    }

    let years: BTreeSet<i32> = data.paired.iter().map(|p| p.year).collect();
    let colors = ColorMap::new(&years);

    let mut by_year: BTreeMap<i32, Vec<[f64; 2]>> = BTreeMap::new();
    for p in &data.paired {
        if let (Some(obesity), Some(malnutrition)) = (p.obesity, p.malnutrition) {
            by_year
                .entry(p.year)
                .or_default()
                .push([obesity, malnutrition]);
        }
    }

    Plot::new("paradox_plot")
        .legend(Legend::default())
        .x_axis_label("Obesity Rate (%)")
        .y_axis_label("Malnutrition Rate (%)")
        .show(ui, |plot_ui| {
            for (year, points) in by_year {
                let points: PlotPoints = points.into_iter().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(year.to_string())
                        .color(colors.color_for(&year))
                        .radius(3.0),
                );
            }
        });
}
