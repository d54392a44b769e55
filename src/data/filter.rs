use std::collections::BTreeSet;

use super::model::{Dataset, DatasetKind, Record};

// ---------------------------------------------------------------------------
// FilterSelection – what the user picked in the side panel
// ---------------------------------------------------------------------------

/// Current filter selection. Rebuilt from the widgets on every interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSelection {
    /// Selected regions. Empty means nothing is shown (no implicit "all").
    pub regions: BTreeSet<String>,
    /// Inclusive `(min, max)`; an inverted range matches nothing.
    pub year_range: (i32, i32),
    /// Case-insensitive country substring; `None` or empty means no constraint.
    pub country: Option<String>,
}

impl FilterSelection {
    /// Everything selected: all regions, the full year range, no search.
    pub fn all(dataset: &Dataset) -> Self {
        FilterSelection {
            regions: dataset.regions.clone(),
            year_range: dataset.year_bounds.unwrap_or((0, 0)),
            country: None,
        }
    }

    /// Whether `record` satisfies all three conjuncts.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_with(record, self.country_needle().as_deref())
    }

    /// `matches` with the lower-cased search string already prepared.
    fn matches_with(&self, record: &Record, needle: Option<&str>) -> bool {
        let (lo, hi) = self.year_range;

        let region_ok = record
            .region
            .as_ref()
            .is_some_and(|r| self.regions.contains(r));
        let year_ok = lo <= record.year && record.year <= hi;
        let country_ok = needle.map_or(true, |n| record.country.to_lowercase().contains(n));

        region_ok && year_ok && country_ok
    }

    fn country_needle(&self) -> Option<String> {
        self.country
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

// ---------------------------------------------------------------------------
// FilteredView – indices into a dataset
// ---------------------------------------------------------------------------

/// A derived subset of a [`Dataset`]. Always built fresh by [`filter`].
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// The whole dataset, unfiltered.
    pub fn full(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn kind(&self) -> DatasetKind {
        self.dataset.kind
    }

    /// Matching records in source order.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Most recent year present in the view.
    pub fn latest_year(&self) -> Option<i32> {
        self.records().map(|r| r.year).max()
    }
}

/// Apply `selection` to `dataset`.
///
/// A record passes when its region is selected, its year lies in the
/// inclusive range, and (if a search string is set) its country contains the
/// search string case-insensitively. Records without a region never pass.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    if selection.regions.is_empty() || selection.year_range.0 > selection.year_range.1 {
        return FilteredView {
            dataset,
            indices: Vec::new(),
        };
    }

    let needle = selection.country_needle();
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches_with(r, needle.as_deref()))
        .map(|(i, _)| i)
        .collect();

    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::rec;

    fn sample() -> Dataset {
        Dataset::from_records(
            DatasetKind::Obesity,
            vec![
                rec("India", "South-East Asia", 2010, 3.9),
                rec("Indonesia", "South-East Asia", 2015, 6.9),
                rec("Kenya", "Africa", 2015, 7.1),
                rec("United Kingdom", "Europe", 2020, 27.8),
                rec("Atlantis", "", 2015, 50.0),
            ],
        )
    }

    fn regions(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn countries<'a>(view: &FilteredView<'a>) -> Vec<&'a str> {
        view.records().map(|r| r.country.as_str()).collect()
    }

    #[test]
    fn all_selection_keeps_every_region_bearing_record() {
        let ds = sample();
        let view = filter(&ds, &FilterSelection::all(&ds));
        assert_eq!(
            countries(&view),
            vec!["India", "Indonesia", "Kenya", "United Kingdom"]
        );
        assert_eq!(view.kind(), DatasetKind::Obesity);
    }

    #[test]
    fn empty_regions_yield_empty_view() {
        let ds = sample();
        let selection = FilterSelection {
            regions: BTreeSet::new(),
            ..FilterSelection::all(&ds)
        };
        assert!(filter(&ds, &selection).is_empty());
    }

    #[test]
    fn inverted_year_range_yields_empty_view() {
        let ds = sample();
        let selection = FilterSelection {
            year_range: (2020, 2010),
            ..FilterSelection::all(&ds)
        };
        assert!(filter(&ds, &selection).is_empty());
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let ds = sample();
        let selection = FilterSelection {
            year_range: (2015, 2020),
            ..FilterSelection::all(&ds)
        };
        assert_eq!(
            countries(&filter(&ds, &selection)),
            vec!["Indonesia", "Kenya", "United Kingdom"]
        );
    }

    #[test]
    fn country_search_is_case_insensitive_substring() {
        let ds = sample();
        let selection = FilterSelection {
            country: Some("INDI".to_string()),
            ..FilterSelection::all(&ds)
        };
        assert_eq!(countries(&filter(&ds, &selection)), vec!["India"]);

        let selection = FilterSelection {
            country: Some("ind".to_string()),
            ..FilterSelection::all(&ds)
        };
        assert_eq!(
            countries(&filter(&ds, &selection)),
            vec!["India", "Indonesia"]
        );
    }

    #[test]
    fn search_matches_whitespace_as_typed() {
        let ds = sample();
        let selection = FilterSelection {
            country: Some(" KING".to_string()),
            ..FilterSelection::all(&ds)
        };
        assert_eq!(countries(&filter(&ds, &selection)), vec!["United Kingdom"]);

        let selection = FilterSelection {
            country: Some(" india".to_string()),
            ..FilterSelection::all(&ds)
        };
        assert!(filter(&ds, &selection).is_empty());
        assert!(ds.records.iter().all(|r| !selection.matches(r)));
    }

    #[test]
    fn empty_search_string_does_not_filter() {
        let ds = sample();
        let selection = FilterSelection {
            country: Some(String::new()),
            ..FilterSelection::all(&ds)
        };
        assert_eq!(filter(&ds, &selection).len(), 4);
    }

    #[test]
    fn every_result_satisfies_all_conjuncts() {
        let ds = sample();
        let selection = FilterSelection {
            regions: regions(&["South-East Asia", "Africa"]),
            year_range: (2012, 2018),
            country: Some("n".to_string()),
        };
        let view = filter(&ds, &selection);
        assert_eq!(countries(&view), vec!["Indonesia", "Kenya"]);
        for r in view.records() {
            assert!(selection.regions.contains(r.region.as_ref().unwrap()));
            assert!((2012..=2018).contains(&r.year));
            assert!(r.country.to_lowercase().contains('n'));
        }
    }

    #[test]
    fn latest_year_of_view() {
        let ds = sample();
        let selection = FilterSelection {
            regions: regions(&["Africa", "South-East Asia"]),
            ..FilterSelection::all(&ds)
        };
        assert_eq!(filter(&ds, &selection).latest_year(), Some(2015));
        assert_eq!(
            filter(&ds, &FilterSelection::default()).latest_year(),
            None
        );
    }
}
