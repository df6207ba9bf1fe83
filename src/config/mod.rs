//! Configuration module for the StatusHawk console
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`STATUSHAWK_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use statushawk::config::ConsoleConfig;
//!
//! // Load defaults
//! let config = ConsoleConfig::default();
//! assert_eq!(config.polling.list_interval_seconds, 5);
//!
//! // Parse from TOML
//! let toml = r#"
//! [api]
//! base_url = "https://api.example.com/api/v1"
//! "#;
//! let config: ConsoleConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.api.base_url, "https://api.example.com/api/v1");
//! ```

pub mod api;
pub mod error;
pub mod logging;
pub mod polling;
pub mod session;

pub use api::ApiConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;
pub use session::SessionConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the console.
///
/// Aggregates the API endpoint, session persistence, polling, and logging
/// sections. Every section has sensible defaults so the console works with
/// no config file at all.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend API settings
    pub api: ApiConfig,
    /// Token persistence settings
    pub session: SessionConfig,
    /// Refetch intervals for live views
    pub polling: PollingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ConsoleConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports STATUSHAWK_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("STATUSHAWK_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("STATUSHAWK_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.api.timeout_seconds = t;
            }
        }
        if let Ok(path) = std::env::var("STATUSHAWK_TOKEN_PATH") {
            self.session.token_path = Some(path.into());
        }
        if let Ok(level) = std::env::var("STATUSHAWK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("STATUSHAWK_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.is_empty() {
            return Err(ConfigError::Validation {
                field: "api.base_url".to_string(),
                message: "base URL cannot be empty".to_string(),
            });
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(ConfigError::Validation {
                field: "api.base_url".to_string(),
                message: "base URL must start with http:// or https://".to_string(),
            });
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "api.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.polling.list_interval_seconds == 0 || self.polling.detail_interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "polling".to_string(),
                message: "polling intervals must be non-zero".to_string(),
            });
        }
        if self.session.watch_interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "session.watch_interval_seconds".to_string(),
                message: "watch interval must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}
