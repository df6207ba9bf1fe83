//! Wire types for the StatusHawk REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last-known availability of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MonitorStatus {
    Up,
    Down,
    Unknown,
}

/// A configured endpoint the backend periodically checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    pub id: u64,
    pub name: String,
    pub url: String,
    /// Check interval in seconds
    pub interval: u32,
    pub monitor_type: String,
    pub status: MonitorStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<DateTime<Utc>>,
}

/// Payload for creating a monitor.
#[derive(Debug, Clone, Serialize)]
pub struct NewMonitor {
    pub name: String,
    pub url: String,
    pub interval: u32,
    pub monitor_type: String,
}

/// One backend-performed probe of a monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorHistoryEntry {
    pub id: u64,
    pub status_code: u16,
    pub response_time_ms: Option<f64>,
    pub is_up: bool,
    pub created_at: DateTime<Utc>,
}

/// Time-windowed aggregate statistics for a monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorStats {
    pub period: String,
    pub total_checks: u64,
    pub up_count: u64,
    pub down_count: u64,
    pub uptime_percentage: f64,
    pub avg_response_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check: Option<MonitorHistoryEntry>,
}

/// One entry of the overview's recent-failure feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: u64,
    pub monitor_name: String,
    pub url: String,
    pub code: u16,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Account-wide dashboard statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total: u64,
    pub active: u64,
    pub up: u64,
    pub down: u64,
    pub avg_latency: f64,
    #[serde(default)]
    pub recent_failures: Vec<Incident>,
}

/// A configured notification channel (e.g. Telegram).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationChannel {
    pub id: u64,
    pub provider: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One-time Telegram deep link used to connect a channel out-of-band.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramLink {
    pub link: String,
}

/// Standard paginated envelope.
///
/// `count` is the authoritative total; `results` never exceeds the page size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// Login/signup response.
///
/// The canonical shape is a top-level `token`; `data.token` and `key` are
/// accepted as legacy fallbacks from older API deployments, in that order.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub data: Option<AuthResponseData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponseData {
    #[serde(default)]
    pub token: Option<String>,
}

impl AuthResponse {
    /// Extract the bearer token, preferring the canonical shape.
    pub fn into_token(self) -> Result<String, super::ApiError> {
        self.token
            .or(self.data.and_then(|d| d.token))
            .or(self.key)
            .ok_or_else(|| {
                super::ApiError::InvalidResponse(
                    "login response carried no token".to_string(),
                )
            })
    }
}
