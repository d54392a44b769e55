/// Analytical-insights path: a fixed catalog of SQL queries dispatched
/// against the relational store.
///
/// ```text
///   Catalog × label ──► QueryId ──► Dispatcher ──► Store::connect()
///                                        │               │
///                                        │        StoreConnection::query(sql)
///                                        ▼               │
///                                   QueryOutcome ◄── QueryResult / QueryError
/// ```

pub mod catalog;
pub mod dialect;
pub mod dispatch;
pub mod store;
pub mod table;

pub use catalog::{Catalog, CombinedQuery, MalnutritionQuery, ObesityQuery, QueryId};
pub use dispatch::{Dispatcher, QueryOutcome};
pub use store::{DuckDbStore, Store, StoreConnection, StoreLocation};
pub use table::{Cell, QueryResult};
