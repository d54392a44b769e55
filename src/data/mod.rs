/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json   (obesity + malnutrition)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → DatasetStore
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ DatasetStore │  two immutable Datasets, region + year index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  regions × year range × country search → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  trends, top-N, distributions, (Country, Year) join
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
