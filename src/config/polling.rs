//! Refetch interval configuration for live views

use serde::{Deserialize, Serialize};

/// Polling intervals used by the query layer while a view is mounted.
///
/// Lists and the dashboard overview refresh faster than per-monitor
/// stats and history, which change at check granularity anyway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval for monitor lists and dashboard stats, in seconds
    pub list_interval_seconds: u64,
    /// Interval for per-monitor stats and history, in seconds
    pub detail_interval_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            list_interval_seconds: 5,
            detail_interval_seconds: 10,
        }
    }
}
