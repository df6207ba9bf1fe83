//! Cache key addressing.

use std::fmt;

/// Identifier addressing one cached result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// One page of the monitor list.
    Monitors { page: u32 },
    /// A single monitor's info.
    Monitor(u64),
    /// A monitor's windowed stats.
    MonitorStats(u64),
    /// A monitor's check history.
    MonitorHistory(u64),
    /// Account-wide dashboard stats.
    DashboardStats,
    /// Notification channels.
    Channels,
}

/// Key family, used for family-wide invalidation and for serving the
/// previous page as placeholder data while a sibling page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFamily {
    Monitors,
    Monitor,
    MonitorStats,
    MonitorHistory,
    DashboardStats,
    Channels,
}

impl QueryKey {
    pub fn family(&self) -> QueryFamily {
        match self {
            QueryKey::Monitors { .. } => QueryFamily::Monitors,
            QueryKey::Monitor(_) => QueryFamily::Monitor,
            QueryKey::MonitorStats(_) => QueryFamily::MonitorStats,
            QueryKey::MonitorHistory(_) => QueryFamily::MonitorHistory,
            QueryKey::DashboardStats => QueryFamily::DashboardStats,
            QueryKey::Channels => QueryFamily::Channels,
        }
    }

    /// Whether this key belongs to a paginated family, i.e. whether a
    /// sibling page may stand in as placeholder data.
    pub fn is_paginated(&self) -> bool {
        matches!(self, QueryKey::Monitors { .. })
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Monitors { page } => write!(f, "monitors:page={}", page),
            QueryKey::Monitor(id) => write!(f, "monitor:{}", id),
            QueryKey::MonitorStats(id) => write!(f, "monitor-stats:{}", id),
            QueryKey::MonitorHistory(id) => write!(f, "monitor-history:{}", id),
            QueryKey::DashboardStats => write!(f, "dashboard-stats"),
            QueryKey::Channels => write!(f, "channels"),
        }
    }
}
