//! Output formatting helpers for CLI commands

use crate::api::types::{
    DashboardStats, Monitor, MonitorHistoryEntry, MonitorStats, MonitorStatus,
    NotificationChannel, Paginated,
};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;
use std::fmt::Write;

/// View model for monitor display
#[derive(Debug, Clone, serde::Serialize)]
pub struct MonitorView {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub status: MonitorStatus,
    pub is_active: bool,
    pub interval: u32,
    pub created_at: String,
}

impl From<&Monitor> for MonitorView {
    fn from(monitor: &Monitor) -> Self {
        Self {
            id: monitor.id,
            name: monitor.name.clone(),
            url: monitor.url.clone(),
            status: monitor.status,
            is_active: monitor.is_active,
            interval: monitor.interval,
            created_at: monitor.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn status_cell(status: MonitorStatus) -> String {
    match status {
        MonitorStatus::Up => "UP".green().to_string(),
        MonitorStatus::Down => "DOWN".red().to_string(),
        MonitorStatus::Unknown => "UNKNOWN".yellow().to_string(),
    }
}

/// Get status icon for monitor status
pub fn status_icon(status: MonitorStatus) -> &'static str {
    match status {
        MonitorStatus::Up => "✓",
        MonitorStatus::Down => "✗",
        MonitorStatus::Unknown => "?",
    }
}

/// Format a monitor list page as a table with pagination footer
pub fn format_monitors_table(page: &Paginated<Monitor>, page_number: u32) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "URL", "Status", "Active", "Interval", "Added"]);

    for monitor in &page.results {
        let view = MonitorView::from(monitor);
        table.add_row(vec![
            Cell::new(view.id),
            Cell::new(&view.name),
            Cell::new(&view.url),
            Cell::new(status_cell(view.status)),
            Cell::new(if view.is_active { "yes" } else { "paused" }),
            Cell::new(format!("{}s", view.interval)),
            Cell::new(&view.created_at),
        ]);
    }

    let mut output = table.to_string();
    output.push('\n');
    let _ = write!(
        output,
        "Page {} - {} of {} monitors{}{}",
        page_number,
        page.results.len(),
        page.count,
        if page.has_previous() { " [prev]" } else { "" },
        if page.has_next() { " [next]" } else { "" },
    );
    output
}

/// Format a monitor list page as JSON
pub fn format_monitors_json(page: &Paginated<Monitor>) -> String {
    let views: Vec<MonitorView> = page.results.iter().map(MonitorView::from).collect();
    serde_json::to_string_pretty(&json!({
        "count": page.count,
        "monitors": views,
    }))
    .unwrap_or_default()
}

/// Format the dashboard overview as pretty text
pub fn format_overview(stats: &DashboardStats) -> String {
    let mut output = String::new();

    writeln!(output, "{}", "StatusHawk Overview".bold()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Monitors: {} total, {} active", stats.total, stats.active).unwrap();
    writeln!(
        output,
        "Up: {}   Down: {}",
        stats.up.to_string().green(),
        if stats.down > 0 {
            stats.down.to_string().red().to_string()
        } else {
            stats.down.to_string()
        }
    )
    .unwrap();
    writeln!(output, "Avg latency: {:.0}ms", stats.avg_latency).unwrap();

    if !stats.recent_failures.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "{}", "Recent incidents:".red()).unwrap();
        for incident in &stats.recent_failures {
            writeln!(
                output,
                "  ✗ {} ({}) - {} - {}",
                incident.monitor_name,
                incident.url,
                incident.reason,
                incident.created_at.format("%Y-%m-%d %H:%M"),
            )
            .unwrap();
        }
    }

    output
}

/// Format the monitor detail view: info, 24h stats, history summary.
///
/// Any of the secondary sections may still be loading or unavailable; the
/// primary monitor info renders regardless.
pub fn format_monitor_detail(
    monitor: &Monitor,
    stats: Option<&MonitorStats>,
    history: Option<&[MonitorHistoryEntry]>,
) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "{} {} [{}]",
        status_icon(monitor.status),
        monitor.name.bold(),
        status_cell(monitor.status)
    )
    .unwrap();
    writeln!(output, "{}", monitor.url).unwrap();
    writeln!(
        output,
        "Checked every {}s - {}",
        monitor.interval,
        if monitor.is_active { "active" } else { "paused" }
    )
    .unwrap();

    writeln!(output).unwrap();
    match stats {
        Some(stats) => {
            writeln!(output, "Last {}:", stats.period).unwrap();
            writeln!(output, "  Uptime:       {:.2}%", stats.uptime_percentage).unwrap();
            writeln!(output, "  Avg response: {:.0}ms", stats.avg_response_time).unwrap();
            writeln!(
                output,
                "  Checks:       {} total, {} down",
                stats.total_checks, stats.down_count
            )
            .unwrap();
        }
        None => writeln!(output, "Stats unavailable").unwrap(),
    }

    writeln!(output).unwrap();
    match history {
        Some(history) if !history.is_empty() => {
            writeln!(output, "Response time history ({} checks):", history.len()).unwrap();
            writeln!(output, "  {}", sparkline(history)).unwrap();
            let times: Vec<f64> = history.iter().filter_map(|h| h.response_time_ms).collect();
            if !times.is_empty() {
                let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = times.iter().cloned().fold(0.0_f64, f64::max);
                let avg = times.iter().sum::<f64>() / times.len() as f64;
                writeln!(
                    output,
                    "  min {:.0}ms / avg {:.0}ms / max {:.0}ms",
                    min, avg, max
                )
                .unwrap();
            }
        }
        _ => writeln!(output, "No history yet").unwrap(),
    }

    output
}

/// Render response times as a unicode sparkline, oldest first.
fn sparkline(history: &[MonitorHistoryEntry]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let times: Vec<Option<f64>> = history
        .iter()
        .rev()
        .map(|h| if h.is_up { h.response_time_ms } else { None })
        .collect();
    let max = times
        .iter()
        .filter_map(|t| *t)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    times
        .iter()
        .map(|t| match t {
            Some(ms) => {
                let idx = ((ms / max) * (BARS.len() - 1) as f64).round() as usize;
                BARS[idx.min(BARS.len() - 1)]
            }
            None => 'x', // failed check
        })
        .collect()
}

/// Format notification channels as a table
pub fn format_channels_table(channels: &[NotificationChannel]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Provider", "Name", "Connected"]);

    for channel in channels {
        table.add_row(vec![
            Cell::new(channel.id),
            Cell::new(&channel.provider),
            Cell::new(&channel.name),
            Cell::new(channel.created_at.format("%Y-%m-%d").to_string()),
        ]);
    }

    table.to_string()
}

/// Format notification channels as JSON
pub fn format_channels_json(channels: &[NotificationChannel]) -> String {
    serde_json::to_string_pretty(&json!({ "channels": channels })).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_monitor() -> Monitor {
        Monitor {
            id: 7,
            name: "prod".to_string(),
            url: "https://example.com".to_string(),
            interval: 30,
            monitor_type: "HTTP".to_string(),
            status: MonitorStatus::Up,
            is_active: true,
            created_at: chrono::Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap(),
            updated_at: None,
            last_checked_at: None,
        }
    }

    fn test_page() -> Paginated<Monitor> {
        Paginated {
            count: 21,
            next: Some("/monitors/?page=2".to_string()),
            previous: None,
            results: vec![test_monitor()],
        }
    }

    #[test]
    fn test_format_monitors_table_with_data() {
        let output = format_monitors_table(&test_page(), 1);
        assert!(output.contains("prod"));
        assert!(output.contains("21 monitors"));
        assert!(output.contains("[next]"));
        assert!(!output.contains("[prev]"));
    }

    #[test]
    fn test_format_monitors_json_valid() {
        let output = format_monitors_json(&test_page());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["count"], 21);
        assert_eq!(parsed["monitors"][0]["id"], 7);
    }

    #[test]
    fn test_format_overview() {
        let stats = DashboardStats {
            total: 5,
            active: 4,
            up: 3,
            down: 1,
            avg_latency: 210.4,
            recent_failures: vec![],
        };
        let output = format_overview(&stats);
        assert!(output.contains("5 total"));
        assert!(output.contains("210ms"));
        assert!(!output.contains("Recent incidents"));
    }

    #[test]
    fn test_format_detail_renders_without_secondary_queries() {
        let output = format_monitor_detail(&test_monitor(), None, None);
        assert!(output.contains("prod"));
        assert!(output.contains("Stats unavailable"));
        assert!(output.contains("No history yet"));
    }

    #[test]
    fn test_sparkline_marks_failures() {
        let entry = |ms: Option<f64>, up: bool| MonitorHistoryEntry {
            id: 1,
            status_code: if up { 200 } else { 500 },
            response_time_ms: ms,
            is_up: up,
            created_at: chrono::Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap(),
        };
        let history = vec![entry(Some(100.0), true), entry(None, false)];
        let line = sparkline(&history);
        assert_eq!(line.chars().count(), 2);
        assert!(line.contains('x'));
    }

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(MonitorStatus::Up), "✓");
        assert_eq!(status_icon(MonitorStatus::Down), "✗");
        assert_eq!(status_icon(MonitorStatus::Unknown), "?");
    }
}
