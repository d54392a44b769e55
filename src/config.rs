use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_FILE: &str = "nutrition.json";
const ENV_CONFIG: &str = "NUTRITION_CONFIG";
const ENV_OBESITY: &str = "NUTRITION_OBESITY_PATH";
const ENV_MALNUTRITION: &str = "NUTRITION_MALNUTRITION_PATH";
const ENV_STORE_URL: &str = "NUTRITION_STORE_URL";

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Where the datasets and the relational store live.
///
/// Resolved from defaults, then an optional JSON file, then environment
/// variables. Store locations and credentials never live in source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub obesity_path: PathBuf,
    pub malnutrition_path: PathBuf,
    pub store_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            obesity_path: PathBuf::from("cleaned_obesity.csv"),
            malnutrition_path: PathBuf::from("cleaned_malnutrition.csv"),
            store_url: "duckdb://nutrition.duckdb".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `$NUTRITION_CONFIG` or `./nutrition.json` (if present), then
    /// apply environment overrides.
    pub fn load() -> Result<Self> {
        let file = std::env::var_os(ENV_CONFIG)
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from(CONFIG_FILE)).filter(|p| p.exists()));

        let mut config = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Apply `NUTRITION_*` overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup(ENV_OBESITY) {
            self.obesity_path = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_MALNUTRITION) {
            self.malnutrition_path = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_STORE_URL) {
            self.store_url = v;
        }
    }

    /// Same file names, resolved inside `dir`.
    pub fn with_data_dir(&self, dir: &Path) -> Self {
        let rebase = |p: &Path| match p.file_name() {
            Some(name) => dir.join(name),
            None => dir.to_path_buf(),
        };
        Self {
            obesity_path: rebase(&self.obesity_path),
            malnutrition_path: rebase(&self.malnutrition_path),
            store_url: self.store_url.clone(),
        }
    }
}
