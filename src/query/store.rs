use std::borrow::Cow;
use std::path::{Path, PathBuf};

use duckdb::types::Value;
use duckdb::{params, AccessMode, Config, Connection};

use super::dialect::duckdb_compatible;
use super::table::{Cell, QueryResult};
use crate::data::model::{DatasetKind, DatasetStore};
use crate::error::QueryError;

// ---------------------------------------------------------------------------
// Store seams
// ---------------------------------------------------------------------------

/// Something that hands out short-lived connections to a relational store.
pub trait Store {
    type Connection: StoreConnection;

    /// Acquire a fresh connection. It is released when dropped.
    fn connect(&self) -> Result<Self::Connection, QueryError>;
}

/// One open connection.
pub trait StoreConnection {
    /// Run `sql` verbatim and collect the whole result table.
    fn query(&mut self, sql: &str) -> Result<QueryResult, QueryError>;
}

// ---------------------------------------------------------------------------
// DuckDB
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Private in-memory database; every connection starts empty.
    Memory,
    File(PathBuf),
}

impl StoreLocation {
    /// Accepts `duckdb://memory`, `duckdb://<path>` (so `duckdb:///abs/x.duckdb`
    /// for absolute paths), `:memory:`, or a bare path.
    pub fn parse(url: &str) -> Self {
        let rest = url.strip_prefix("duckdb://").unwrap_or(url);
        match rest {
            "" | "memory" | ":memory:" => StoreLocation::Memory,
            path => StoreLocation::File(PathBuf::from(path)),
        }
    }
}

/// The embedded DuckDB store holding the `obesity` and `malnutrition` tables.
#[derive(Debug, Clone)]
pub struct DuckDbStore {
    location: StoreLocation,
}

impl DuckDbStore {
    pub fn new(location: StoreLocation) -> Self {
        DuckDbStore { location }
    }

    pub fn from_url(url: &str) -> Self {
        Self::new(StoreLocation::parse(url))
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(StoreLocation::File(path.to_path_buf()))
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    fn open(&self, read_only: bool) -> duckdb::Result<Connection> {
        match &self.location {
            StoreLocation::Memory => Connection::open_in_memory(),
            StoreLocation::File(path) if read_only => {
                let config = Config::default().access_mode(AccessMode::ReadOnly)?;
                Connection::open_with_flags(path, config)
            }
            StoreLocation::File(path) => Connection::open(path),
        }
    }

    /// (Re)create both tables and fill them from `data`.
    ///
    /// Runs as one transaction: on failure the previous tables are kept.
    pub fn seed(&self, data: &DatasetStore) -> Result<(), QueryError> {
        let mut conn = self
            .open(false)
            .map_err(|e| QueryError::Connect(e.to_string()))?;
        let exec = |e: duckdb::Error| QueryError::Execute(e.to_string());

        let tx = conn.transaction().map_err(exec)?;
        for kind in DatasetKind::ALL {
            let table = kind.table_name();
            let level = kind.level_column();
            tx.execute_batch(&format!(
                "DROP TABLE IF EXISTS {table};
CREATE TABLE {table} (
    Region VARCHAR,
    Country VARCHAR,
    Year INTEGER,
    Gender VARCHAR,
    Age_Group VARCHAR,
    Mean_Estimate DOUBLE,
    CI_Width DOUBLE,
    {level} VARCHAR
);"
            ))
            .map_err(exec)?;

            let mut appender = tx.appender(table).map_err(exec)?;
            for r in &data.get(kind).records {
                appender
                    .append_row(params![
                        r.region.as_deref(),
                        r.country.as_str(),
                        r.year,
                        r.gender.as_str(),
                        r.age_group.as_str(),
                        r.mean_estimate,
                        r.ci_width,
                        r.level.as_str(),
                    ])
                    .map_err(exec)?;
            }
            appender.flush().map_err(exec)?;

            log::info!(
                "Seeded table '{table}' with {} rows",
                data.get(kind).len()
            );
        }
        tx.commit().map_err(exec)
    }
}

impl Store for DuckDbStore {
    type Connection = DuckDbConnection;

    fn connect(&self) -> Result<DuckDbConnection, QueryError> {
        let conn = self
            .open(true)
            .map_err(|e| QueryError::Connect(e.to_string()))?;
        log::debug!("store connection acquired ({:?})", self.location);
        Ok(DuckDbConnection { conn })
    }
}

/// A read-only DuckDB connection, closed on drop.
pub struct DuckDbConnection {
    conn: Connection,
}

impl StoreConnection for DuckDbConnection {
    fn query(&mut self, sql: &str) -> Result<QueryResult, QueryError> {
        let exec = |e: duckdb::Error| QueryError::Execute(e.to_string());

        let sql = duckdb_compatible(sql);
        if let Cow::Owned(adapted) = &sql {
            log::debug!("running adapted SQL: {adapted}");
        }
        let mut stmt = self.conn.prepare(&sql).map_err(exec)?;
        let mut rows = stmt.query([]).map_err(exec)?;
        let columns: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(exec)? {
            let mut cells = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value: Value = row.get(i).map_err(exec)?;
                cells.push(cell_from_value(value));
            }
            out.push(cells);
        }
        Ok(QueryResult::new(columns, out))
    }
}

impl Drop for DuckDbConnection {
    fn drop(&mut self) {
        log::trace!("store connection released");
    }
}

fn cell_from_value(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Boolean(b) => Cell::Bool(b),
        Value::TinyInt(i) => Cell::Integer(i.into()),
        Value::SmallInt(i) => Cell::Integer(i.into()),
        Value::Int(i) => Cell::Integer(i.into()),
        Value::BigInt(i) => Cell::Integer(i),
        Value::UTinyInt(i) => Cell::Integer(i.into()),
        Value::USmallInt(i) => Cell::Integer(i.into()),
        Value::UInt(i) => Cell::Integer(i.into()),
        Value::UBigInt(i) => i64::try_from(i)
            .map(Cell::Integer)
            .unwrap_or(Cell::Float(i as f64)),
        Value::HugeInt(i) => i64::try_from(i)
            .map(Cell::Integer)
            .unwrap_or(Cell::Float(i as f64)),
        Value::Float(f) => Cell::Float(f.into()),
        Value::Double(f) => Cell::Float(f),
        Value::Decimal(d) => {
            let text = d.to_string();
            text.parse::<f64>().map(Cell::Float).unwrap_or(Cell::Text(text))
        }
        Value::Text(s) => Cell::Text(s),
        other => Cell::Text(format!("{other:?}")),
    }
}
