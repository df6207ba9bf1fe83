//! Session persistence configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the bearer token lives on disk and how often the watcher
/// re-reads it to pick up changes made by other processes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Token file path. Defaults to `~/.statushawk/token` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,
    /// Interval between token file re-reads, in seconds
    pub watch_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_path: None,
            watch_interval_seconds: 1,
        }
    }
}

impl SessionConfig {
    /// Resolve the effective token file path.
    pub fn resolve_token_path(&self) -> PathBuf {
        if let Some(path) = &self.token_path {
            return path.clone();
        }
        dirs_next::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".statushawk")
            .join("token")
    }
}
