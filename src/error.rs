use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Load errors – fatal at startup
// ---------------------------------------------------------------------------

/// Failure to turn a dataset file into a [`Dataset`](crate::data::model::Dataset).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed parquet in {path}: {message}")]
    Parquet { path: PathBuf, message: String },

    #[error("malformed JSON in {path}: {message}")]
    Json { path: PathBuf, message: String },

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Query errors – recovered by the dispatcher
// ---------------------------------------------------------------------------

/// Failure to run a catalog query against the relational store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("could not connect to store: {0}")]
    Connect(String),

    #[error("query failed: {0}")]
    Execute(String),

    #[error("no query labelled '{label}' in the {catalog} catalog")]
    UnknownQuery { catalog: String, label: String },
}
