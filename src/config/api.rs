//! Backend API endpoint configuration

use serde::{Deserialize, Serialize};

/// Connection settings for the StatusHawk REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the API, including the version prefix
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.statushawk.local/api/v1".to_string(),
            timeout_seconds: 30,
        }
    }
}
