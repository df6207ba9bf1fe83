//! Monitor endpoints: CRUD, stats, and history.

use super::types::{Monitor, MonitorHistoryEntry, MonitorStats, NewMonitor, Paginated};
use super::{ApiClient, ApiError};
use serde::Serialize;

/// Minimum allowed check interval, matching the dashboard's form constraint.
pub const MIN_INTERVAL_SECONDS: u32 = 10;

#[derive(Serialize)]
struct ToggleBody {
    is_active: bool,
}

impl ApiClient {
    /// `GET /monitors/?page=N` - one page of the monitor list.
    pub async fn list_monitors(&self, page: u32) -> Result<Paginated<Monitor>, ApiError> {
        let path = if page <= 1 {
            "/monitors/".to_string()
        } else {
            format!("/monitors/?page={}", page)
        };
        self.get_json(&path).await
    }

    /// `POST /monitors/` - register a new monitor.
    pub async fn create_monitor(&self, new: &NewMonitor) -> Result<Monitor, ApiError> {
        if new.name.is_empty() || new.url.is_empty() {
            return Err(ApiError::Validation(
                "name and url are required".to_string(),
            ));
        }
        if new.interval < MIN_INTERVAL_SECONDS {
            return Err(ApiError::Validation(format!(
                "interval must be at least {} seconds",
                MIN_INTERVAL_SECONDS
            )));
        }
        self.post_json("/monitors/", new).await
    }

    /// `GET /monitors/{id}/` - a single monitor.
    pub async fn get_monitor(&self, id: u64) -> Result<Monitor, ApiError> {
        self.get_json(&format!("/monitors/{}/", id)).await
    }

    /// `PATCH /monitors/{id}/` - set `is_active`.
    pub async fn set_monitor_active(&self, id: u64, is_active: bool) -> Result<Monitor, ApiError> {
        self.patch_json(&format!("/monitors/{}/", id), &ToggleBody { is_active })
            .await
    }

    /// `DELETE /monitors/{id}/`.
    pub async fn delete_monitor(&self, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("/monitors/{}/", id)).await
    }

    /// `GET /monitors/{id}/stats/?period=24h` - windowed aggregates.
    pub async fn monitor_stats(&self, id: u64, period: &str) -> Result<MonitorStats, ApiError> {
        self.get_json(&format!("/monitors/{}/stats/?period={}", id, period))
            .await
    }

    /// `GET /monitors/{id}/history/` - recent checks, newest first.
    pub async fn monitor_history(
        &self,
        id: u64,
    ) -> Result<Paginated<MonitorHistoryEntry>, ApiError> {
        self.get_json(&format!("/monitors/{}/history/", id)).await
    }

    /// `GET /monitors/dashboard_stats` - account-wide overview.
    pub async fn dashboard_stats(&self) -> Result<super::types::DashboardStats, ApiError> {
        self.get_json("/monitors/dashboard_stats").await
    }
}
