//! Configuration surface
//!
//! Runtime settings come from an optional YAML file with environment
//! variable overrides on top. Everything has a default except the source
//! location, which stays optional until a run is actually triggered.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source file to ingest. Required at trigger time, not at load time.
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Rows buffered per transactional write
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Persistence settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// DuckDB database path; `:memory:` keeps data for the process lifetime
    /// only, a file path persists across runs
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Target table name
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: None,
            batch_size: default_batch_size(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            table: default_table(),
        }
    }
}

fn default_batch_size() -> usize {
    1000
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_table() -> String {
    "people".to_string()
}

impl AppConfig {
    /// Load configuration: file if given, defaults otherwise, then
    /// environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply `ROWLIFT_*` environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(source) = std::env::var("ROWLIFT_SOURCE") {
            if !source.is_empty() {
                self.source = Some(PathBuf::from(source));
            }
        }
        if let Ok(batch) = std::env::var("ROWLIFT_BATCH_SIZE") {
            if let Ok(n) = batch.parse() {
                self.batch_size = n;
            }
        }
        if let Ok(db) = std::env::var("ROWLIFT_DATABASE") {
            if !db.is_empty() {
                self.database.path = db;
            }
        }
        if let Ok(table) = std::env::var("ROWLIFT_TABLE") {
            if !table.is_empty() {
                self.database.table = table;
            }
        }
    }

    /// Validate field constraints
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::config("batch_size must be a positive integer"));
        }
        if self.database.table.is_empty() {
            return Err(Error::config("database.table cannot be empty"));
        }
        Ok(())
    }

    /// The configured source, or the configuration error the trigger surface
    /// reports when it is unset
    pub fn require_source(&self) -> Result<&Path> {
        self.source
            .as_deref()
            .ok_or_else(|| Error::missing_field("source"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.source, None);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.database.table, "people");
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
source: /data/people.csv
batch_size: 250
database:
  path: /var/lib/rowlift/people.duckdb
  table: members
"#;
        let config = AppConfig::from_str(yaml).unwrap();
        assert_eq!(config.source, Some(PathBuf::from("/data/people.csv")));
        assert_eq!(config.batch_size, 250);
        assert_eq!(config.database.path, "/var/lib/rowlift/people.duckdb");
        assert_eq!(config.database.table, "members");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = AppConfig::from_str("source: a.csv\n").unwrap();
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.database.table, "people");
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = AppConfig::from_str("batch_size: 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("ROWLIFT_SOURCE", "/env/people.csv");
        std::env::set_var("ROWLIFT_BATCH_SIZE", "42");
        std::env::set_var("ROWLIFT_TABLE", "members");

        let mut config = AppConfig::default();
        config.apply_env();

        std::env::remove_var("ROWLIFT_SOURCE");
        std::env::remove_var("ROWLIFT_BATCH_SIZE");
        std::env::remove_var("ROWLIFT_TABLE");

        assert_eq!(config.source, Some(PathBuf::from("/env/people.csv")));
        assert_eq!(config.batch_size, 42);
        assert_eq!(config.database.table, "members");
    }

    #[test]
    fn test_require_source() {
        let config = AppConfig::default();
        let err = config.require_source().unwrap_err();
        assert_eq!(err.to_string(), "Missing required config field: source");

        let config = AppConfig {
            source: Some(PathBuf::from("a.csv")),
            ..AppConfig::default()
        };
        assert_eq!(config.require_source().unwrap(), Path::new("a.csv"));
    }
}
