use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod loader;

pub use loader::ConfigLoader;

use crate::error::{AggregationError, ErrorCode, Result};
use crate::pipeline::runner::DEFAULT_MAX_CONCURRENT_JOBS;

/// System-wide configuration file, used when present and nothing else is given
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ganymede/ganymede.toml";

pub const DEFAULT_DATABASE: &str = "ganymede";

/// Get the per-user data directory for the file store
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "ganymede", "ganymede")
        .map(|dirs| dirs.data_dir().join("store"))
        .unwrap_or_else(|| PathBuf::from("./ganymede-store"))
}

/// Store backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// JSON-lines files on disk (default)
    #[default]
    File,
    /// In-memory collections, discarded on exit
    Memory,
}

impl std::str::FromStr for BackendType {
    type Err = AggregationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(AggregationError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!("unknown store backend '{}', expected 'file' or 'memory'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log filter used when no `-v` flag is given
    pub log_level: Option<String>,
    pub store: StoreSettings,
    pub jobs: JobSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: BackendType,
    pub data_dir: PathBuf,
    pub database: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    pub max_concurrent_jobs: usize,
    /// Jobs run when none are named on the command line; empty means all
    pub enabled: Vec<String>,
    /// YAML file with additional shapes
    pub shapes_file: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: BackendType::default(),
            data_dir: default_data_dir(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
            enabled: Vec::new(),
            shapes_file: None,
        }
    }
}

impl Settings {
    /// Apply `GANYMEDE_*` overrides from the process environment
    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.merge_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `GANYMEDE_*` overrides from any key lookup
    pub fn merge_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("GANYMEDE_STORE_BACKEND") {
            self.store.backend = backend.parse()?;
        }

        if let Some(dir) = lookup("GANYMEDE_DATA_DIR") {
            self.store.data_dir = PathBuf::from(dir);
        }

        if let Some(database) = lookup("GANYMEDE_DATABASE") {
            self.store.database = database;
        }

        if let Some(max) = lookup("GANYMEDE_MAX_CONCURRENT_JOBS") {
            self.jobs.max_concurrent_jobs = max.trim().parse().map_err(|_| {
                AggregationError::config_with_code(
                    ErrorCode::CONFIG_INVALID_VALUE,
                    format!("GANYMEDE_MAX_CONCURRENT_JOBS must be a number, got '{}'", max),
                )
            })?;
        }

        if let Some(level) = lookup("GANYMEDE_LOG_LEVEL") {
            self.log_level = Some(level);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.jobs.max_concurrent_jobs == 0 {
            return Err(AggregationError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "jobs.max_concurrent_jobs must be at least 1",
            ));
        }
        if self.store.database.trim().is_empty() {
            return Err(AggregationError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "store.database must not be empty",
            ));
        }
        Ok(())
    }
}
