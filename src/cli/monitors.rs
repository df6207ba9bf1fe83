//! Monitor commands: list, add, toggle, delete, and the detail view

use crate::api::types::{Monitor, MonitorHistoryEntry, MonitorStats, NewMonitor, Paginated};
use crate::cli::output::{format_monitor_detail, format_monitors_json, format_monitors_table};
use crate::cli::{Console, MonitorArgs, MonitorsAddArgs, MonitorsDeleteArgs, MonitorsListArgs,
    MonitorsToggleArgs};
use crate::query::{Poller, QueryFamily, QueryKey, QuerySnapshot};
use crate::session::SessionEvent;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Handle monitors list command
pub async fn handle_monitors_list(
    args: &MonitorsListArgs,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    let page = args.page;
    let client = &console.client;
    let result = console
        .cache
        .fetch(QueryKey::Monitors { page }, || client.list_monitors(page))
        .await?;
    let listing: Paginated<Monitor> = result.data;

    if args.json {
        Ok(format_monitors_json(&listing))
    } else {
        Ok(format_monitors_table(&listing, page))
    }
}

/// Handle monitors add command
pub async fn handle_monitors_add(
    args: &MonitorsAddArgs,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    let new = NewMonitor {
        name: args.name.clone(),
        url: args.url.clone(),
        interval: args.interval,
        monitor_type: "HTTP".to_string(),
    };
    let monitor = console.client.create_monitor(&new).await?;
    console.cache.invalidate_family(QueryFamily::Monitors);

    Ok(format!(
        "Added monitor {} ({}) with id {}",
        monitor.name.bold(),
        monitor.url,
        monitor.id
    ))
}

/// Handle monitors toggle command: pause an active monitor, resume a paused one.
pub async fn handle_monitors_toggle(
    args: &MonitorsToggleArgs,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    let current = console.client.get_monitor(args.id).await?;
    let monitor = console
        .client
        .set_monitor_active(args.id, !current.is_active)
        .await?;

    console.cache.invalidate_family(QueryFamily::Monitors);
    console.cache.invalidate(&QueryKey::Monitor(args.id));

    Ok(format!(
        "Monitor {} is now {}",
        monitor.name.bold(),
        if monitor.is_active {
            "active".green()
        } else {
            "paused".yellow()
        }
    ))
}

/// Handle monitors delete command
pub async fn handle_monitors_delete(
    args: &MonitorsDeleteArgs,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    let confirmed = args.yes || confirm(&format!("Delete monitor {}? [y/N]", args.id))?;
    delete_if_confirmed(console, args.id, confirmed).await
}

/// Deletion gate: no network call is issued unless `confirmed`.
pub async fn delete_if_confirmed(
    console: &Console,
    id: u64,
    confirmed: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    if !confirmed {
        return Ok("Aborted.".to_string());
    }

    console.client.delete_monitor(id).await?;
    console.cache.invalidate_family(QueryFamily::Monitors);
    console.cache.invalidate(&QueryKey::Monitor(id));

    Ok(format!("Deleted monitor {}", id))
}

fn confirm(question: &str) -> Result<bool, Box<dyn std::error::Error>> {
    eprint!("{} ", question);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

/// Handle monitor detail command: three independent queries. The monitor
/// itself must resolve; stats and history are best-effort extras.
pub async fn handle_monitor_detail(
    args: &MonitorArgs,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    if args.watch {
        return watch_monitor_detail(args.id, console).await;
    }

    let id = args.id;
    let client = &console.client;

    let monitor: Monitor = console
        .cache
        .fetch(QueryKey::Monitor(id), || client.get_monitor(id))
        .await?
        .data;

    let stats: Option<MonitorStats> = console
        .cache
        .fetch(QueryKey::MonitorStats(id), || client.monitor_stats(id, "24h"))
        .await
        .map(|r| r.data)
        .ok();

    let history: Option<Paginated<MonitorHistoryEntry>> = console
        .cache
        .fetch(QueryKey::MonitorHistory(id), || client.monitor_history(id))
        .await
        .map(|r| r.data)
        .ok();

    if args.json {
        let value = serde_json::json!({
            "monitor": monitor,
            "stats": stats,
            "history": history.as_ref().map(|h| &h.results),
        });
        Ok(serde_json::to_string_pretty(&value)?)
    } else {
        Ok(format_monitor_detail(
            &monitor,
            stats.as_ref(),
            history.as_ref().map(|h| h.results.as_slice()),
        ))
    }
}

type StatsWatch = (Poller, watch::Receiver<QuerySnapshot<MonitorStats>>);
type HistoryWatch = (
    Poller,
    watch::Receiver<QuerySnapshot<Paginated<MonitorHistoryEntry>>>,
);

/// Start the secondary-query pollers for the live detail view. Stats and
/// history refresh on the detail interval, slower than list views since
/// they only change at check granularity.
fn start_detail_pollers(console: &Console, id: u64) -> (StatsWatch, HistoryWatch) {
    let every = Duration::from_secs(console.config.polling.detail_interval_seconds);

    let client = console.client.clone();
    let stats = console
        .cache
        .poll(QueryKey::MonitorStats(id), every, move || {
            let client = client.clone();
            async move { client.monitor_stats(id, "24h").await }
        });

    let client = console.client.clone();
    let history = console
        .cache
        .poll(QueryKey::MonitorHistory(id), every, move || {
            let client = client.clone();
            async move { client.monitor_history(id).await }
        });

    (stats, history)
}

/// Live detail view: stats and history refresh on the detail polling
/// interval until interrupted, the session ends, or the token expires.
async fn watch_monitor_detail(
    id: u64,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    let client = &console.client;
    let monitor: Monitor = console
        .cache
        .fetch(QueryKey::Monitor(id), || client.get_monitor(id))
        .await?
        .data;

    let cancel = CancellationToken::new();
    let watcher = console.session.start_watcher(
        Duration::from_secs(console.config.session.watch_interval_seconds),
        cancel.clone(),
    );
    let mut session_events = console.session.subscribe();

    let ((stats_poller, mut stats_rx), (history_poller, mut history_rx)) =
        start_detail_pollers(console, id);

    render_detail(
        &monitor,
        &stats_rx.borrow_and_update(),
        &history_rx.borrow_and_update(),
    );

    let outcome = loop {
        tokio::select! {
            changed = stats_rx.changed() => {
                if changed.is_err() {
                    break "Polling stopped.".to_string();
                }
                render_detail(&monitor, &stats_rx.borrow_and_update(), &history_rx.borrow_and_update());
            }
            changed = history_rx.changed() => {
                if changed.is_err() {
                    break "Polling stopped.".to_string();
                }
                render_detail(&monitor, &stats_rx.borrow_and_update(), &history_rx.borrow_and_update());
            }
            event = session_events.recv() => {
                match event {
                    Ok(SessionEvent::Expired) => {
                        break "Session expired. Run `statushawk login` to sign in again.".to_string();
                    }
                    Ok(SessionEvent::LoggedOut) => break "Logged out.".to_string(),
                    Ok(SessionEvent::ExternalChange) if !console.session.is_authenticated() => {
                        break "Logged out in another terminal.".to_string();
                    }
                    _ => {}
                }
            }
            _ = tokio::signal::ctrl_c() => break "Stopped.".to_string(),
        }
    };

    drop(stats_poller);
    drop(history_poller);
    cancel.cancel();
    let _ = watcher.await;
    Ok(outcome)
}

fn render_detail(
    monitor: &Monitor,
    stats: &QuerySnapshot<MonitorStats>,
    history: &QuerySnapshot<Paginated<MonitorHistoryEntry>>,
) {
    // ANSI clear screen + cursor home
    print!("\x1b[2J\x1b[H");
    print!(
        "{}",
        format_monitor_detail(
            monitor,
            stats.data.as_ref(),
            history.data.as_ref().map(|h| h.results.as_slice()),
        )
    );
    if let Some(error) = stats.error.as_deref().or(history.error.as_deref()) {
        println!();
        println!("(refresh failed - {})", error);
    }
}
