use std::fmt;

// ---------------------------------------------------------------------------
// Cell – a single value in a query result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Numeric view of the cell, for charting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => write!(f, "<null>"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v:.4}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// QueryResult – named columns plus rows
// ---------------------------------------------------------------------------

/// The table returned by one catalog query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        QueryResult { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of column `index` as floats (`None` for non-numeric cells).
    pub fn column_f64(&self, index: usize) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|row| row.get(index).and_then(Cell::as_f64))
            .collect()
    }

    /// Whether every non-null cell of column `index` is numeric.
    pub fn is_numeric_column(&self, index: usize) -> bool {
        !self.rows.is_empty()
            && self.rows.iter().all(|row| {
                matches!(
                    row.get(index),
                    Some(Cell::Integer(_) | Cell::Float(_) | Cell::Null)
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryResult {
        QueryResult::new(
            vec!["Country".into(), "Avg".into()],
            vec![
                vec![Cell::Text("India".into()), Cell::Float(4.5)],
                vec![Cell::Text("Chile".into()), Cell::Integer(30)],
                vec![Cell::Text("Peru".into()), Cell::Null],
            ],
        )
    }

    #[test]
    fn numeric_column_extraction() {
        let t = sample();
        assert_eq!(t.column_f64(1), vec![Some(4.5), Some(30.0), None]);
        assert!(t.is_numeric_column(1));
        assert!(!t.is_numeric_column(0));
        assert_eq!(t.column_index("Avg"), Some(1));
    }

    #[test]
    fn empty_table() {
        let t = QueryResult::empty();
        assert!(t.is_empty());
        assert!(!t.is_numeric_column(0));
    }

    #[test]
    fn display_formats() {
        assert_eq!(Cell::Float(1.0).to_string(), "1.0000");
        assert_eq!(Cell::Null.to_string(), "<null>");
        assert_eq!(Cell::Text("x".into()).to_string(), "x");
    }
}
