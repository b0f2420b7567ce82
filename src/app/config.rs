//! Application configuration
//!
//! Runtime switches that come from the command line rather than the
//! settings file.

/// Application configuration structure
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Log filter from settings or environment, used at verbosity 0
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create a new application configuration
    pub fn new(verbose: u8) -> Self {
        Self {
            verbose,
            log_level: None,
        }
    }

    /// Set the fallback log filter
    pub fn with_log_level(mut self, level: Option<String>) -> Self {
        self.log_level = level;
        self
    }

    /// Get the log filter based on verbosity
    pub fn log_level(&self) -> String {
        match self.verbose {
            0 => self
                .log_level
                .clone()
                .unwrap_or_else(|| "info".to_string()),
            1 => "debug".to_string(),
            2 => "trace".to_string(),
            _ => "trace,tokio=debug,runtime=debug".to_string(),
        }
    }
}
