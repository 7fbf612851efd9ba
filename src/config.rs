//! Configuration loaded from a TOML file.

use crate::error::StoreResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where schedule records and the catalog are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One SQLite file holding catalog, records and the simulated date.
    #[default]
    Sqlite,
    /// A JSON record map plus a JSON catalog file.
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrsConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
    /// Tracing filter directive, e.g. "info" or "srs_engine=debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("srs.sqlite3")
}
fn default_records_path() -> PathBuf {
    PathBuf::from("srs_records.json")
}
fn default_catalog_path() -> PathBuf {
    PathBuf::from("srs_catalog.json")
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SrsConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_path: default_database_path(),
            records_path: default_records_path(),
            catalog_path: default_catalog_path(),
            log_level: default_log_level(),
        }
    }
}

impl SrsConfig {
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> StoreResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SrsConfig::load_or_default(None).unwrap();
        assert_eq!(config.backend, StoreBackend::Sqlite);
        assert_eq!(config.database_path, PathBuf::from("srs.sqlite3"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("srs.toml");
        fs::write(
            &path,
            "backend = \"json\"\nrecords_path = \"data/records.json\"\n",
        )
        .unwrap();

        let config = SrsConfig::load(&path).unwrap();
        assert_eq!(config.backend, StoreBackend::Json);
        assert_eq!(config.records_path, PathBuf::from("data/records.json"));
        assert_eq!(config.catalog_path, PathBuf::from("srs_catalog.json"));
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("srs.toml");
        fs::write(&path, "backend = \"postgres\"\n").unwrap();

        assert!(SrsConfig::load(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(SrsConfig::load_or_default(Some(Path::new("no_such_config.toml"))).is_err());
    }
}
