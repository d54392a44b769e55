use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, Dataset, DatasetKind, DatasetStore, Record};
use crate::config::AppConfig;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both datasets named by `config` into a fresh store.
pub fn load_store(config: &AppConfig) -> Result<DatasetStore, LoadError> {
    let obesity = load_dataset(&config.obesity_path, DatasetKind::Obesity)?;
    let malnutrition = load_dataset(&config.malnutrition_path, DatasetKind::Malnutrition)?;
    log::info!(
        "Loaded {} obesity and {} malnutrition records",
        obesity.len(),
        malnutrition.len()
    );
    Ok(DatasetStore::new(obesity, malnutrition))
}

/// Load one dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line (recommended)
/// * `.parquet` – flat columns, as written by `df.to_parquet()`
/// * `.json`    – `[{ "Country": ..., "Year": ..., ... }, ...]`
///
/// Every column in [`Column::REQUIRED`] must be present; others are ignored.
pub fn load_dataset(path: &Path, kind: DatasetKind) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path, kind)?,
        "parquet" | "pq" => load_parquet(path, kind)?,
        "json" => load_json(path, kind)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::debug!("{}: {} {} records", path.display(), records.len(), kind);
    Ok(Dataset::from_records(kind, records))
}

// ---------------------------------------------------------------------------
// Cell conversion shared by all formats
// ---------------------------------------------------------------------------

/// A raw cell as found in the source file, before typing.
#[derive(Debug, Clone, PartialEq)]
enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl RawValue {
    fn describe(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Integer(i) => i.to_string(),
            RawValue::Float(f) => f.to_string(),
            RawValue::Null => "<null>".to_string(),
        }
    }
}

/// Builds one [`Record`] from a row accessor, typing each required column.
///
/// Blank, NaN or unparsable numeric cells become missing values. A row
/// without a usable Year can never pass a year filter and is skipped.
struct RowContext<'a> {
    path: &'a Path,
    kind: DatasetKind,
    row: usize,
}

impl RowContext<'_> {
    fn text(&self, raw: RawValue) -> Option<String> {
        match raw {
            RawValue::Text(s) if s.trim().is_empty() => None,
            RawValue::Text(s) => Some(s),
            RawValue::Integer(i) => Some(i.to_string()),
            RawValue::Float(f) => Some(f.to_string()),
            RawValue::Null => None,
        }
    }

    fn year(&self, raw: RawValue) -> Option<i32> {
        let parsed = match &raw {
            RawValue::Integer(i) => i32::try_from(*i).ok(),
            RawValue::Float(f) => integral(*f),
            RawValue::Text(s) => {
                let s = s.trim();
                s.parse::<i32>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            RawValue::Null => None,
        };
        if parsed.is_none() {
            log::warn!(
                "{}, row {}: skipping record with year '{}'",
                self.path.display(),
                self.row,
                raw.describe()
            );
        }
        parsed
    }

    fn number(&self, col: Column, raw: RawValue) -> Option<f64> {
        let parsed = match &raw {
            RawValue::Float(f) => Some(*f),
            RawValue::Integer(i) => Some(*i as f64),
            RawValue::Text(s) if s.trim().is_empty() => return None,
            RawValue::Text(s) => {
                let parsed = s.trim().parse::<f64>().ok();
                if parsed.is_none() {
                    log::warn!(
                        "{}, row {}: treating '{}' in column '{}' as missing",
                        self.path.display(),
                        self.row,
                        s,
                        col.header(self.kind)
                    );
                }
                parsed
            }
            RawValue::Null => None,
        };
        parsed.filter(|v| !v.is_nan())
    }

    fn record(&self, mut get: impl FnMut(Column) -> RawValue) -> Option<Record> {
        Some(Record {
            country: self.text(get(Column::Country)).unwrap_or_default(),
            region: self.text(get(Column::Region)),
            year: self.year(get(Column::Year))?,
            gender: self.text(get(Column::Gender)).unwrap_or_default(),
            age_group: self.text(get(Column::AgeGroup)).unwrap_or_default(),
            mean_estimate: self.number(Column::MeanEstimate, get(Column::MeanEstimate)),
            ci_width: self.number(Column::CiWidth, get(Column::CiWidth)),
            level: self.text(get(Column::Level)).unwrap_or_default(),
        })
    }
}

fn integral(f: f64) -> Option<i32> {
    if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

fn missing(path: &Path, kind: DatasetKind, col: Column) -> LoadError {
    LoadError::MissingColumn {
        path: path.to_path_buf(),
        column: col.header(kind).to_string(),
    }
}

/// Resolve each required column to its position among `headers`.
fn column_positions<S: AsRef<str>>(
    path: &Path,
    kind: DatasetKind,
    headers: &[S],
) -> Result<[usize; 8], LoadError> {
    let mut positions = [0usize; 8];
    for (slot, col) in positions.iter_mut().zip(Column::REQUIRED) {
        *slot = headers
            .iter()
            .position(|h| h.as_ref().trim() == col.header(kind))
            .ok_or_else(|| missing(path, kind, col))?;
    }
    Ok(positions)
}

fn slot(col: Column) -> usize {
    Column::REQUIRED
        .iter()
        .position(|c| *c == col)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path, kind: DatasetKind) -> Result<Vec<Record>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let positions = column_positions(path, kind, &headers)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let line = result.map_err(csv_err)?;
        let ctx = RowContext { path, kind, row };
        let record = ctx.record(|col| match line.get(positions[slot(col)]) {
            Some(s) if !s.is_empty() => RawValue::Text(s.to_string()),
            _ => RawValue::Null,
        });
        records.extend(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per required field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), including dictionary-encoded strings.
fn load_parquet(path: &Path, kind: DatasetKind) -> Result<Vec<Record>, LoadError> {
    let parquet_err = |message: String| LoadError::Parquet {
        path: path.to_path_buf(),
        message,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| parquet_err(e.to_string()))?;

    let field_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let positions = column_positions(path, kind, &field_names)?;

    let reader = builder.build().map_err(|e| parquet_err(e.to_string()))?;

    let mut records = Vec::new();
    let mut offset = 0;
    for batch_result in reader {
        let batch = batch_result.map_err(|e| parquet_err(e.to_string()))?;
        for row in 0..batch.num_rows() {
            let ctx = RowContext {
                path,
                kind,
                row: offset + row,
            };
            records.extend(ctx.record(|col| extract_raw(batch.column(positions[slot(col)]), row)));
        }
        offset += batch.num_rows();
    }
    Ok(records)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_raw(col: &ArrayRef, row: usize) -> RawValue {
    if col.is_null(row) {
        return RawValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => RawValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => RawValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => RawValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => RawValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => RawValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => RawValue::Float(col.as_primitive::<Float64Type>().value(row)),
        _ => match array_value_to_string(col.as_ref(), row) {
            Ok(s) => RawValue::Text(s),
            Err(_) => RawValue::Null,
        },
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Country": "India", "Region": "South-East Asia", "Year": 2012, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path, kind: DatasetKind) -> Result<Vec<Record>, LoadError> {
    let json_err = |message: String| LoadError::Json {
        path: path.to_path_buf(),
        message,
    };

    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| json_err(e.to_string()))?;
    let rows = root
        .as_array()
        .ok_or_else(|| json_err("expected top-level JSON array".to_string()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, value) in rows.iter().enumerate() {
        let obj = value
            .as_object()
            .ok_or_else(|| json_err(format!("row {row} is not a JSON object")))?;

        for col in Column::REQUIRED {
            if !obj.contains_key(col.header(kind)) {
                return Err(missing(path, kind, col));
            }
        }

        let ctx = RowContext { path, kind, row };
        let record = ctx.record(|col| match obj.get(col.header(kind)) {
            Some(v) => json_to_raw(v),
            None => RawValue::Null,
        });
        records.extend(record);
    }
    Ok(records)
}

fn json_to_raw(val: &JsonValue) -> RawValue {
    match val {
        JsonValue::String(s) => RawValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                RawValue::Float(f)
            } else {
                RawValue::Text(n.to_string())
            }
        }
        JsonValue::Null => RawValue::Null,
        other => RawValue::Text(other.to_string()),
    }
}
