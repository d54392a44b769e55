use std::collections::HashMap;

use nutrition_paradox::config::AppConfig;
use nutrition_paradox::data::aggregate::{
    paired_correlation, regional_distribution, top_n, yearly_mean_trend, PairedPoint, RankField,
    RegionSample, YearMean,
};
use nutrition_paradox::data::filter::{filter, FilterSelection, FilteredView};
use nutrition_paradox::data::model::{DatasetStore, Record};
use nutrition_paradox::query::{Catalog, Dispatcher, DuckDbStore, QueryId, QueryOutcome};

const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// View selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainView {
    Explore,
    Insights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreTab {
    Trends,
    Comparisons,
    Distributions,
    Paradox,
}

impl ExploreTab {
    pub const ALL: [ExploreTab; 4] = [
        ExploreTab::Trends,
        ExploreTab::Comparisons,
        ExploreTab::Distributions,
        ExploreTab::Paradox,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ExploreTab::Trends => "Trends",
            ExploreTab::Comparisons => "Comparisons",
            ExploreTab::Distributions => "Distributions",
            ExploreTab::Paradox => "Nutrition Paradox",
        }
    }
}

// ---------------------------------------------------------------------------
// Exploration – everything the visual tabs draw, derived from the filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Exploration {
    pub visible_obesity: usize,
    pub visible_malnutrition: usize,
    pub obesity_trend: Vec<YearMean>,
    pub malnutrition_trend: Vec<YearMean>,
    /// Latest year in the filtered obesity data; ranks both datasets.
    pub top_year: Option<i32>,
    pub top_obesity: Vec<Record>,
    pub top_malnutrition: Vec<Record>,
    pub distribution: Vec<RegionSample>,
    pub paired: Vec<PairedPoint>,
}

impl Exploration {
    pub fn compute(store: &DatasetStore, selection: &FilterSelection) -> Self {
        let obesity = filter(&store.obesity, selection);
        let malnutrition = filter(&store.malnutrition, selection);

        let top_year = obesity.latest_year();
        let top = |view: &FilteredView<'_>| match top_year {
            Some(year) => top_n(view, year, TOP_N, RankField::MeanEstimate),
            None => Vec::new(),
        };

        Exploration {
            visible_obesity: obesity.len(),
            visible_malnutrition: malnutrition.len(),
            obesity_trend: yearly_mean_trend(&obesity),
            malnutrition_trend: yearly_mean_trend(&malnutrition),
            top_year,
            top_obesity: top(&obesity),
            top_malnutrition: top(&malnutrition),
            distribution: regional_distribution(&obesity, &malnutrition),
            paired: paired_correlation(&obesity, &malnutrition),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded datasets. Replaced wholesale on reload, never mutated.
    pub store: DatasetStore,

    /// Current filter selection.
    pub selection: FilterSelection,

    /// Raw text of the country search box.
    pub country_input: String,

    /// Derived data for the visual tabs (cached until the filters change).
    pub exploration: Exploration,

    pub main_view: MainView,
    pub explore_tab: ExploreTab,

    /// Active analytical-insights tab and the label picked in each.
    pub catalog: Catalog,
    pub selected_queries: HashMap<Catalog, QueryId>,

    /// Result of the last executed query.
    pub outcome: Option<(QueryId, QueryOutcome)>,

    pub dispatcher: Dispatcher<DuckDbStore>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, store: DatasetStore) -> Self {
        let dispatcher = Dispatcher::new(DuckDbStore::from_url(&config.store_url));
        let selection = FilterSelection::all(&store.obesity);
        let exploration = Exploration::compute(&store, &selection);
        Self {
            config,
            store,
            selection,
            country_input: String::new(),
            exploration,
            main_view: MainView::Explore,
            explore_tab: ExploreTab::Trends,
            catalog: Catalog::Obesity,
            selected_queries: Catalog::ALL
                .into_iter()
                .map(|c| (c, c.default_query()))
                .collect(),
            outcome: None,
            dispatcher,
            status_message: None,
        }
    }

    /// Swap in a freshly loaded store and reset the filters to match it.
    pub fn set_store(&mut self, store: DatasetStore) {
        self.selection = FilterSelection::all(&store.obesity);
        self.country_input.clear();
        self.store = store;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the derived exploration data after a filter change.
    pub fn refilter(&mut self) {
        self.exploration = Exploration::compute(&self.store, &self.selection);
    }

    /// Toggle a single region in the filter.
    pub fn toggle_region(&mut self, region: &str) {
        if !self.selection.regions.remove(region) {
            self.selection.regions.insert(region.to_string());
        }
        self.refilter();
    }

    pub fn select_all_regions(&mut self) {
        self.selection.regions = self.store.obesity.regions.clone();
        self.refilter();
    }

    pub fn select_no_regions(&mut self) {
        self.selection.regions.clear();
        self.refilter();
    }

    pub fn set_year_range(&mut self, min: i32, max: i32) {
        self.selection.year_range = (min, max);
        self.refilter();
    }

    /// Push the search box contents into the selection, exactly as typed.
    pub fn apply_country_search(&mut self) {
        self.selection.country = if self.country_input.is_empty() {
            None
        } else {
            Some(self.country_input.clone())
        };
        self.refilter();
    }

    pub fn selected_query(&self, catalog: Catalog) -> QueryId {
        self.selected_queries
            .get(&catalog)
            .copied()
            .unwrap_or_else(|| catalog.default_query())
    }

    /// Record a new label choice and run it.
    pub fn select_query(&mut self, id: QueryId) {
        self.selected_queries.insert(id.catalog(), id);
        self.run_query(id);
    }

    /// Make sure the displayed outcome belongs to the active tab's selection.
    pub fn ensure_query_current(&mut self) {
        let id = self.selected_query(self.catalog);
        if self.outcome.as_ref().map(|(shown, _)| *shown) != Some(id) {
            self.run_query(id);
        }
    }

    pub fn run_query(&mut self, id: QueryId) {
        let outcome = self.dispatcher.run(id);
        self.outcome = Some((id, outcome));
    }
}

#[cfg(test)]
mod tests {
    use nutrition_paradox::data::model::{Dataset, DatasetKind};

    use super::*;

    fn rec(country: &str, region: &str, year: i32, estimate: f64) -> Record {
        Record {
            country: country.to_string(),
            region: Some(region.to_string()),
            year,
            gender: "Both".to_string(),
            age_group: "Adult".to_string(),
            mean_estimate: Some(estimate),
            ci_width: Some(1.0),
            level: "Moderate".to_string(),
        }
    }

    fn state() -> AppState {
        let store = DatasetStore::new(
            Dataset::from_records(
                DatasetKind::Obesity,
                vec![
                    rec("India", "Asia", 2020, 4.0),
                    rec("India", "Asia", 2021, 5.0),
                    rec("Chad", "Africa", 2021, 9.0),
                ],
            ),
            Dataset::from_records(
                DatasetKind::Malnutrition,
                vec![rec("India", "Asia", 2021, 20.0), rec("Chad", "Africa", 2021, 30.0)],
            ),
        );
        let config = AppConfig {
            store_url: "duckdb://memory".to_string(),
            ..AppConfig::default()
        };
        AppState::new(config, store)
    }

    #[test]
    fn starts_with_everything_visible() {
        let s = state();
        assert_eq!(s.exploration.visible_obesity, 3);
        assert_eq!(s.exploration.visible_malnutrition, 2);
        assert_eq!(s.exploration.top_year, Some(2021));
        assert_eq!(s.exploration.top_obesity[0].country, "Chad");
        assert_eq!(s.exploration.paired.len(), 2);
    }

    #[test]
    fn filter_changes_recompute_exploration() {
        let mut s = state();
        s.toggle_region("Africa");
        assert_eq!(s.exploration.visible_obesity, 2);
        assert_eq!(s.exploration.top_malnutrition.len(), 1);

        s.set_year_range(2020, 2020);
        assert_eq!(s.exploration.obesity_trend.len(), 1);
        assert!(s.exploration.top_malnutrition.is_empty());

        s.select_no_regions();
        assert_eq!(s.exploration.visible_obesity, 0);
        assert_eq!(s.exploration.top_year, None);

        s.select_all_regions();
        s.set_year_range(2020, 2021);
        s.country_input = "ch".to_string();
        s.apply_country_search();
        assert_eq!(s.selection.country.as_deref(), Some("ch"));
        assert_eq!(s.exploration.visible_obesity, 1);

        // Surrounding spaces are part of the search, so nothing matches.
        s.country_input = " ch ".to_string();
        s.apply_country_search();
        assert_eq!(s.selection.country.as_deref(), Some(" ch "));
        assert_eq!(s.exploration.visible_obesity, 0);

        s.country_input.clear();
        s.apply_country_search();
        assert_eq!(s.selection.country, None);
        assert_eq!(s.exploration.visible_obesity, 3);
    }

    #[test]
    fn failed_query_is_displayed_not_fatal() {
        // An in-memory store has no tables, so every query errors.
        let mut s = state();
        s.ensure_query_current();
        let (id, outcome) = s.outcome.clone().unwrap();
        assert_eq!(id, Catalog::Obesity.default_query());
        assert!(outcome.table.is_empty());
        assert!(outcome.error.is_some());

        s.catalog = Catalog::Combined;
        s.ensure_query_current();
        assert_eq!(s.outcome.as_ref().unwrap().0.catalog(), Catalog::Combined);
    }
}
