use super::catalog::{Catalog, QueryId};
use super::store::{Store, StoreConnection};
use super::table::QueryResult;
use crate::error::QueryError;

// ---------------------------------------------------------------------------
// QueryOutcome – what the insights view displays
// ---------------------------------------------------------------------------

/// A result table plus the error that emptied it, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryOutcome {
    pub table: QueryResult,
    pub error: Option<QueryError>,
}

impl From<Result<QueryResult, QueryError>> for QueryOutcome {
    fn from(result: Result<QueryResult, QueryError>) -> Self {
        match result {
            Ok(table) => QueryOutcome { table, error: None },
            Err(error) => QueryOutcome {
                table: QueryResult::empty(),
                error: Some(error),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Runs catalog queries, one fresh store connection per call.
///
/// No retries, no caching, no pooling.
pub struct Dispatcher<S> {
    store: S,
}

impl<S: Store> Dispatcher<S> {
    pub fn new(store: S) -> Self {
        Dispatcher { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn execute(&self, id: QueryId) -> Result<QueryResult, QueryError> {
        log::debug!("running '{}' from the {} catalog", id.label(), id.catalog());
        let mut conn = self.store.connect()?;
        let result = conn.query(id.sql());
        drop(conn);
        if let Ok(table) = &result {
            log::debug!("'{}' returned {} rows", id.label(), table.len());
        }
        result
    }

    /// Resolve `label` within `catalog`, then [`execute`](Self::execute).
    pub fn execute_label(&self, catalog: Catalog, label: &str) -> Result<QueryResult, QueryError> {
        let id = QueryId::from_label(catalog, label).ok_or_else(|| QueryError::UnknownQuery {
            catalog: catalog.name().to_string(),
            label: label.to_string(),
        })?;
        self.execute(id)
    }

    /// Like [`execute_label`](Self::execute_label) with the catalog given by name.
    pub fn execute_named(&self, catalog: &str, label: &str) -> Result<QueryResult, QueryError> {
        match Catalog::from_name(catalog) {
            Some(c) => self.execute_label(c, label),
            None => Err(QueryError::UnknownQuery {
                catalog: catalog.to_string(),
                label: label.to_string(),
            }),
        }
    }

    /// Execute and fold any failure into a displayable outcome.
    pub fn run(&self, id: QueryId) -> QueryOutcome {
        let result = self.execute(id);
        if let Err(e) = &result {
            log::warn!("query '{}' failed: {e}", id.label());
        }
        result.into()
    }
}
