use std::collections::BTreeMap;

use nutrition_paradox::data::aggregate::RegionSample;
use nutrition_paradox::data::model::DatasetKind;
use nutrition_paradox::query::QueryResult;

// ---------------------------------------------------------------------------
// Box-plot statistics
// ---------------------------------------------------------------------------

/// min / Q1 / median / Q3 / max.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Quantile with linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn five_number(values: &[f64]) -> Option<FiveNumber> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    Some(FiveNumber {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Samples of one region, split by dataset.
pub type RegionGroups = BTreeMap<DatasetKind, Vec<f64>>;

/// Group box-plot samples by region and dataset, regions sorted.
/// Samples without a region or an estimate are left out.
pub fn group_by_region(samples: &[RegionSample]) -> BTreeMap<String, RegionGroups> {
    let mut groups: BTreeMap<String, RegionGroups> = BTreeMap::new();
    for s in samples {
        let (Some(region), Some(estimate)) = (&s.region, s.mean_estimate) else {
            continue;
        };
        groups
            .entry(region.clone())
            .or_default()
            .entry(s.kind)
            .or_default()
            .push(estimate);
    }
    groups
}

// ---------------------------------------------------------------------------
// Query result → chart series
// ---------------------------------------------------------------------------

/// `(label, value)` bars: first column as label, second as value.
/// `None` when the second column is not numeric.
pub fn bar_series(table: &QueryResult) -> Option<Vec<(String, f64)>> {
    if table.columns.len() < 2 || !table.is_numeric_column(1) {
        return None;
    }
    Some(
        table
            .rows
            .iter()
            .filter_map(|row| Some((row[0].to_string(), row[1].as_f64()?)))
            .collect(),
    )
}

/// One named line per numeric column after the first.
///
/// The x coordinate is the first column when it is numeric, otherwise the row
/// position.
pub fn line_series(table: &QueryResult) -> Vec<(String, Vec<[f64; 2]>)> {
    if table.columns.is_empty() {
        return Vec::new();
    }
    let xs: Vec<f64> = if table.is_numeric_column(0) {
        table
            .column_f64(0)
            .into_iter()
            .enumerate()
            .map(|(i, x)| x.unwrap_or(i as f64))
            .collect()
    } else {
        (0..table.len()).map(|i| i as f64).collect()
    };

    (1..table.columns.len())
        .filter(|&c| table.is_numeric_column(c))
        .map(|c| {
            let points = xs
                .iter()
                .zip(table.column_f64(c))
                .filter_map(|(&x, y)| Some([x, y?]))
                .collect();
            (table.columns[c].clone(), points)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use nutrition_paradox::query::Cell;

    use super::*;

    #[test]
    fn five_number_interpolates() {
        let stats = five_number(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
        assert_eq!(stats.max, 4.0);
        assert_eq!(five_number(&[]), None);
        assert_eq!(five_number(&[7.0]).unwrap().median, 7.0);
    }

    #[test]
    fn groups_skip_missing_regions_and_estimates() {
        let samples = vec![
            RegionSample {
                region: Some("Asia".into()),
                kind: DatasetKind::Obesity,
                mean_estimate: Some(1.0),
            },
            RegionSample {
                region: Some("Asia".into()),
                kind: DatasetKind::Malnutrition,
                mean_estimate: Some(2.0),
            },
            RegionSample {
                region: Some("Asia".into()),
                kind: DatasetKind::Malnutrition,
                mean_estimate: None,
            },
            RegionSample {
                region: None,
                kind: DatasetKind::Obesity,
                mean_estimate: Some(3.0),
            },
        ];
        let groups = group_by_region(&samples);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups["Asia"][&DatasetKind::Malnutrition], vec![2.0]);
    }

    #[test]
    fn bars_need_numeric_second_column() {
        let table = QueryResult::new(
            vec!["Gender".into(), "Avg".into()],
            vec![
                vec![Cell::Text("Male".into()), Cell::Float(10.0)],
                vec![Cell::Text("Female".into()), Cell::Float(12.0)],
            ],
        );
        assert_eq!(
            bar_series(&table),
            Some(vec![("Male".to_string(), 10.0), ("Female".to_string(), 12.0)])
        );

        let text = QueryResult::new(
            vec!["Region".into(), "Country".into()],
            vec![vec![Cell::Text("Africa".into()), Cell::Text("Chad".into())]],
        );
        assert_eq!(bar_series(&text), None);
    }

    #[test]
    fn lines_use_numeric_first_column_as_x() {
        let table = QueryResult::new(
            vec!["Year".into(), "Age_Group".into(), "Obesity".into()],
            vec![
                vec![Cell::Integer(2019), Cell::Text("Adult".into()), Cell::Float(1.0)],
                vec![Cell::Integer(2020), Cell::Text("Adult".into()), Cell::Float(2.0)],
            ],
        );
        let series = line_series(&table);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].0, "Obesity");
        assert_eq!(series[0].1, vec![[2019.0, 1.0], [2020.0, 2.0]]);
    }

    #[test]
    fn lines_fall_back_to_row_position() {
        let table = QueryResult::new(
            vec!["Country".into(), "Obesity".into()],
            vec![
                vec![Cell::Text("India".into()), Cell::Float(3.0)],
                vec![Cell::Text("Chile".into()), Cell::Float(4.0)],
            ],
        );
        assert_eq!(line_series(&table)[0].1, vec![[0.0, 3.0], [1.0, 4.0]]);
    }
}
