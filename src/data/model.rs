use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// DatasetKind – which of the two datasets a record belongs to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetKind {
    Obesity,
    Malnutrition,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Obesity, DatasetKind::Malnutrition];

    /// Name of the dataset-specific categorical column.
    pub fn level_column(self) -> &'static str {
        match self {
            DatasetKind::Obesity => "Obesity_Level",
            DatasetKind::Malnutrition => "Malnutrition_Level",
        }
    }

    /// Table name in the relational store.
    pub fn table_name(self) -> &'static str {
        match self {
            DatasetKind::Obesity => "obesity",
            DatasetKind::Malnutrition => "malnutrition",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Obesity => write!(f, "Obesity"),
            DatasetKind::Malnutrition => write!(f, "Malnutrition"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – the required schema shared by both datasets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Country,
    Region,
    Year,
    Gender,
    AgeGroup,
    MeanEstimate,
    CiWidth,
    Level,
}

impl Column {
    pub const REQUIRED: [Column; 8] = [
        Column::Country,
        Column::Region,
        Column::Year,
        Column::Gender,
        Column::AgeGroup,
        Column::MeanEstimate,
        Column::CiWidth,
        Column::Level,
    ];

    /// Header name of the column in a file of the given kind.
    pub fn header(self, kind: DatasetKind) -> &'static str {
        match self {
            Column::Country => "Country",
            Column::Region => "Region",
            Column::Year => "Year",
            Column::Gender => "Gender",
            Column::AgeGroup => "Age_Group",
            Column::MeanEstimate => "Mean_Estimate",
            Column::CiWidth => "CI_Width",
            Column::Level => kind.level_column(),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of either dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    /// `None` when the source row had no region; such rows never match a region filter.
    pub region: Option<String>,
    pub year: i32,
    pub gender: String,
    pub age_group: String,
    /// Prevalence in percent (0–100). `None` for a blank or NaN cell.
    pub mean_estimate: Option<f64>,
    /// Width of the confidence interval around `mean_estimate`.
    pub ci_width: Option<f64>,
    /// `Obesity_Level` or `Malnutrition_Level`, depending on the dataset.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Dataset – one loaded table, read-only after load
// ---------------------------------------------------------------------------

/// An ordered collection of records plus pre-computed filter domains.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub kind: DatasetKind,
    pub records: Vec<Record>,
    /// Sorted distinct non-missing regions.
    pub regions: BTreeSet<String>,
    /// Inclusive (min, max) year, `None` for an empty dataset.
    pub year_bounds: Option<(i32, i32)>,
}

impl Dataset {
    /// Build the region index and year bounds from the loaded records.
    pub fn from_records(kind: DatasetKind, records: Vec<Record>) -> Self {
        let regions: BTreeSet<String> = records
            .iter()
            .filter_map(|r| r.region.clone())
            .collect();

        let year_bounds = records.iter().fold(None, |acc, r| match acc {
            None => Some((r.year, r.year)),
            Some((lo, hi)) => Some((lo.min(r.year), hi.max(r.year))),
        });

        Dataset {
            kind,
            records,
            regions,
            year_bounds,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DatasetStore – both datasets for the lifetime of a session
// ---------------------------------------------------------------------------

/// Holds the two datasets. Never mutated; a reload builds a new store.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    pub obesity: Dataset,
    pub malnutrition: Dataset,
}

impl DatasetStore {
    pub fn new(obesity: Dataset, malnutrition: Dataset) -> Self {
        debug_assert_eq!(obesity.kind, DatasetKind::Obesity);
        debug_assert_eq!(malnutrition.kind, DatasetKind::Malnutrition);
        DatasetStore {
            obesity,
            malnutrition,
        }
    }

    pub fn get(&self, kind: DatasetKind) -> &Dataset {
        match kind {
            DatasetKind::Obesity => &self.obesity,
            DatasetKind::Malnutrition => &self.malnutrition,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Shorthand record constructor for tests.
    pub fn rec(country: &str, region: &str, year: i32, estimate: f64) -> Record {
        Record {
            country: country.to_string(),
            region: if region.is_empty() {
                None
            } else {
                Some(region.to_string())
            },
            year,
            gender: "Both".to_string(),
            age_group: "Adult".to_string(),
            mean_estimate: Some(estimate),
            ci_width: Some(1.0),
            level: "Moderate".to_string(),
        }
    }
}
