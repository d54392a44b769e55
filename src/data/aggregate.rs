use std::collections::{BTreeMap, HashMap};

use super::filter::FilteredView;
use super::model::{DatasetKind, Record};

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearMean {
    pub year: i32,
    pub mean_estimate: f64,
}

/// One box-plot observation tagged with its dataset of origin.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSample {
    pub region: Option<String>,
    pub kind: DatasetKind,
    pub mean_estimate: Option<f64>,
}

/// One row of the obesity × malnutrition inner join on (Country, Year).
/// Estimates are carried through as loaded, missing values included.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedPoint {
    pub country: String,
    pub year: i32,
    pub obesity: Option<f64>,
    pub malnutrition: Option<f64>,
}

/// Numeric field used to rank records in [`top_n`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankField {
    #[default]
    MeanEstimate,
    CiWidth,
}

impl RankField {
    fn value(self, record: &Record) -> Option<f64> {
        match self {
            RankField::MeanEstimate => record.mean_estimate,
            RankField::CiWidth => record.ci_width,
        }
    }
}

// ---------------------------------------------------------------------------
// Transformations
// ---------------------------------------------------------------------------

/// Arithmetic mean of `Mean_Estimate` per year, years ascending.
///
/// Missing estimates are skipped; a year with no estimate at all is absent,
/// like a year without records.
pub fn yearly_mean_trend(view: &FilteredView<'_>) -> Vec<YearMean> {
    let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for r in view.records() {
        let Some(estimate) = r.mean_estimate else {
            continue;
        };
        let entry = groups.entry(r.year).or_insert((0.0, 0));
        entry.0 += estimate;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(year, (sum, n))| YearMean {
            year,
            mean_estimate: sum / n as f64,
        })
        .collect()
}

/// The `n` records of `year` with the largest `field`, descending.
///
/// Records missing `field` are not ranked. The sort is stable, so ties keep
/// their order in the view.
pub fn top_n(view: &FilteredView<'_>, year: i32, n: usize, field: RankField) -> Vec<Record> {
    let mut candidates: Vec<(f64, &Record)> = view
        .records()
        .filter(|r| r.year == year)
        .filter_map(|r| field.value(r).map(|v| (v, r)))
        .collect();
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
    candidates
        .into_iter()
        .take(n)
        .map(|(_, r)| r.clone())
        .collect()
}

/// Both views concatenated (obesity first), each value tagged with its origin.
pub fn regional_distribution(
    obesity: &FilteredView<'_>,
    malnutrition: &FilteredView<'_>,
) -> Vec<RegionSample> {
    [obesity, malnutrition]
        .into_iter()
        .flat_map(|view| {
            let kind = view.kind();
            view.records().map(move |r| RegionSample {
                region: r.region.clone(),
                kind,
                mean_estimate: r.mean_estimate,
            })
        })
        .collect()
}

/// Inner join on (Country, Year).
///
/// Duplicate keys produce the full cartesian pairing; rows without a partner
/// on the other side are dropped. Output follows the obesity view's order,
/// then the malnutrition view's order within a key.
pub fn paired_correlation(
    obesity: &FilteredView<'_>,
    malnutrition: &FilteredView<'_>,
) -> Vec<PairedPoint> {
    let mut by_key: HashMap<(&str, i32), Vec<Option<f64>>> = HashMap::new();
    for r in malnutrition.records() {
        by_key
            .entry((r.country.as_str(), r.year))
            .or_default()
            .push(r.mean_estimate);
    }

    let mut out = Vec::new();
    for o in obesity.records() {
        let Some(matches) = by_key.get(&(o.country.as_str(), o.year)) else {
            continue;
        };
        out.extend(matches.iter().map(|&m| PairedPoint {
            country: o.country.clone(),
            year: o.year,
            obesity: o.mean_estimate,
            malnutrition: m,
        }));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::rec;
    use crate::data::model::Dataset;

    fn obesity() -> Dataset {
        Dataset::from_records(
            DatasetKind::Obesity,
            vec![
                rec("A", "Asia", 2021, 12.0),
                rec("B", "Asia", 2020, 30.0),
                rec("A", "Asia", 2020, 10.0),
                rec("C", "Africa", 2020, 20.0),
                rec("D", "Africa", 2020, 30.0),
                rec("E", "Europe", 2018, 25.0),
            ],
        )
    }

    #[test]
    fn trend_is_mean_per_year_ascending() {
        let ds = obesity();
        let trend = yearly_mean_trend(&FilteredView::full(&ds));
        assert_eq!(
            trend,
            vec![
                YearMean {
                    year: 2018,
                    mean_estimate: 25.0
                },
                YearMean {
                    year: 2020,
                    mean_estimate: 22.5
                },
                YearMean {
                    year: 2021,
                    mean_estimate: 12.0
                },
            ]
        );
        assert!(trend.windows(2).all(|w| w[0].year < w[1].year));
    }

    #[test]
    fn trend_of_empty_view_is_empty() {
        let ds = Dataset::from_records(DatasetKind::Obesity, Vec::new());
        assert!(yearly_mean_trend(&FilteredView::full(&ds)).is_empty());
    }

    #[test]
    fn top_n_sorts_descending_with_stable_ties() {
        let ds = obesity();
        let top = top_n(&FilteredView::full(&ds), 2020, 3, RankField::MeanEstimate);
        let names: Vec<&str> = top.iter().map(|r| r.country.as_str()).collect();
        // B and D tie at 30.0; B comes first in the view.
        assert_eq!(names, vec!["B", "D", "C"]);
    }

    #[test]
    fn top_n_returns_fewer_when_year_is_sparse() {
        let ds = Dataset::from_records(
            DatasetKind::Obesity,
            vec![
                rec("X", "Asia", 2022, 5.0),
                rec("Y", "Asia", 2022, 15.0),
                rec("Z", "Asia", 2021, 99.0),
                rec("W", "Asia", 2022, 10.0),
            ],
        );
        let top = top_n(&FilteredView::full(&ds), 2022, 10, RankField::MeanEstimate);
        assert_eq!(top.len(), 3);
        assert!(top.iter().all(|r| r.year == 2022));
        let estimates: Vec<f64> = top.iter().filter_map(|r| r.mean_estimate).collect();
        assert_eq!(estimates, vec![15.0, 10.0, 5.0]);
    }

    #[test]
    fn top_n_by_ci_width() {
        let mut records = vec![rec("P", "Asia", 2020, 1.0), rec("Q", "Asia", 2020, 2.0)];
        records[0].ci_width = Some(9.0);
        let ds = Dataset::from_records(DatasetKind::Malnutrition, records);
        let top = top_n(&FilteredView::full(&ds), 2020, 1, RankField::CiWidth);
        assert_eq!(top[0].country, "P");
    }

    #[test]
    fn distribution_tags_and_concatenates() {
        let ob = Dataset::from_records(
            DatasetKind::Obesity,
            vec![rec("A", "Asia", 2020, 1.0), rec("B", "Africa", 2020, 2.0)],
        );
        let mal = Dataset::from_records(
            DatasetKind::Malnutrition,
            vec![rec("A", "Asia", 2020, 3.0)],
        );
        let samples = regional_distribution(&FilteredView::full(&ob), &FilteredView::full(&mal));
        let summary: Vec<(&str, DatasetKind, Option<f64>)> = samples
            .iter()
            .map(|s| (s.region.as_deref().unwrap(), s.kind, s.mean_estimate))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Asia", DatasetKind::Obesity, Some(1.0)),
                ("Africa", DatasetKind::Obesity, Some(2.0)),
                ("Asia", DatasetKind::Malnutrition, Some(3.0)),
            ]
        );
    }

    #[test]
    fn paired_correlation_keeps_cartesian_duplicates() {
        let ob = Dataset::from_records(
            DatasetKind::Obesity,
            vec![rec("A", "Asia", 2020, 10.0), rec("A", "Asia", 2020, 20.0)],
        );
        let mal = Dataset::from_records(
            DatasetKind::Malnutrition,
            vec![rec("A", "Asia", 2020, 5.0)],
        );
        let pairs = paired_correlation(&FilteredView::full(&ob), &FilteredView::full(&mal));
        assert_eq!(
            pairs,
            vec![
                PairedPoint {
                    country: "A".into(),
                    year: 2020,
                    obesity: Some(10.0),
                    malnutrition: Some(5.0)
                },
                PairedPoint {
                    country: "A".into(),
                    year: 2020,
                    obesity: Some(20.0),
                    malnutrition: Some(5.0)
                },
            ]
        );
    }

    #[test]
    fn paired_correlation_drops_unmatched_keys() {
        let ob = Dataset::from_records(
            DatasetKind::Obesity,
            vec![rec("A", "Asia", 2020, 10.0), rec("B", "Asia", 2020, 11.0)],
        );
        let mal = Dataset::from_records(
            DatasetKind::Malnutrition,
            vec![rec("A", "Asia", 2019, 5.0), rec("B", "Asia", 2020, 6.0)],
        );
        let pairs = paired_correlation(&FilteredView::full(&ob), &FilteredView::full(&mal));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].country, "B");
    }

    #[test]
    fn swapping_roles_swaps_columns_only() {
        let ob = Dataset::from_records(
            DatasetKind::Obesity,
            vec![
                rec("A", "Asia", 2020, 10.0),
                rec("A", "Asia", 2020, 20.0),
                rec("B", "Asia", 2021, 7.0),
            ],
        );
        let mal = Dataset::from_records(
            DatasetKind::Malnutrition,
            vec![
                rec("B", "Asia", 2021, 1.0),
                rec("A", "Asia", 2020, 5.0),
                rec("A", "Asia", 2020, 6.0),
            ],
        );
        let key = |p: &PairedPoint| {
            (
                p.country.clone(),
                p.year,
                p.obesity.map(f64::to_bits),
                p.malnutrition.map(f64::to_bits),
            )
        };

        let mut forward: Vec<_> =
            paired_correlation(&FilteredView::full(&ob), &FilteredView::full(&mal))
                .iter()
                .map(key)
                .collect();
        let mut swapped: Vec<_> =
            paired_correlation(&FilteredView::full(&mal), &FilteredView::full(&ob))
                .iter()
                .map(|p| {
                    let (c, y, a, b) = key(p);
                    (c, y, b, a)
                })
                .collect();
        forward.sort();
        swapped.sort();
        assert_eq!(forward.len(), 5);
        assert_eq!(forward, swapped);
    }

    #[test]
    fn missing_estimates_are_skipped_like_nan() {
        let mut records = vec![
            rec("A", "Asia", 2020, 10.0),
            rec("B", "Asia", 2020, 0.0),
            rec("C", "Asia", 2020, 30.0),
            rec("D", "Asia", 2021, 0.0),
        ];
        records[1].mean_estimate = None;
        records[3].mean_estimate = None;
        let ds = Dataset::from_records(DatasetKind::Obesity, records);
        let view = FilteredView::full(&ds);

        assert_eq!(
            yearly_mean_trend(&view),
            vec![YearMean {
                year: 2020,
                mean_estimate: 20.0
            }]
        );

        let top = top_n(&view, 2020, 10, RankField::MeanEstimate);
        let names: Vec<&str> = top.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
        assert!(top_n(&view, 2021, 10, RankField::MeanEstimate).is_empty());
    }
}
