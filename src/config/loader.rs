use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::{Settings, SYSTEM_CONFIG_PATH};
use crate::error::{AggregationError, ErrorCode, Result};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "GANYMEDE_CONFIG";

/// Resolves and loads the settings file
///
/// Lookup order: explicit path, `GANYMEDE_CONFIG`, the system file if it
/// exists, built-in defaults. Environment overrides are applied last.
pub struct ConfigLoader {
    system_path: PathBuf,
    apply_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            system_path: PathBuf::from(SYSTEM_CONFIG_PATH),
            apply_env: true,
        }
    }

    /// Use a different fallback file instead of the system one
    pub fn with_system_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_path = path.into();
        self
    }

    /// Skip `GANYMEDE_*` environment lookups
    pub fn without_env(mut self) -> Self {
        self.apply_env = false;
        self
    }

    pub async fn load(&self, explicit: Option<&Path>) -> Result<Settings> {
        let mut settings = match self.resolve_path(explicit).await {
            Some(path) => Self::load_file(&path).await?,
            None => {
                debug!("No configuration file found, using defaults");
                Settings::default()
            }
        };

        if self.apply_env {
            settings.merge_env_vars()?;
        }
        settings.validate()?;
        Ok(settings)
    }

    async fn resolve_path(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if self.apply_env {
            if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
                return Some(PathBuf::from(path));
            }
        }
        match fs::try_exists(&self.system_path).await {
            Ok(true) => Some(self.system_path.clone()),
            _ => None,
        }
    }

    /// Parse one TOML settings file
    pub async fn load_file(path: &Path) -> Result<Settings> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(AggregationError::config_with_code(
                ErrorCode::CONFIG_NOT_FOUND,
                format!("Configuration file not found: {}", path.display()),
            ));
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            AggregationError::config_with_code(
                ErrorCode::CONFIG_READ_FAILED,
                format!("Cannot read {}", path.display()),
            )
            .with_source(e)
        })?;
        let settings: Settings = toml::from_str(&content)
            .map_err(|e| AggregationError::from(e).with_context(path.display()))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(settings)
    }
}
