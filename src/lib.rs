//! Core of the Nutrition Paradox dashboard: obesity and malnutrition datasets,
//! the interactive filter/aggregation pipeline, and the analytical query
//! catalog with its dispatcher. Rendering lives in the binary.

pub mod config;
pub mod data;
pub mod error;
pub mod query;

pub use config::AppConfig;
pub use error::{LoadError, QueryError};
