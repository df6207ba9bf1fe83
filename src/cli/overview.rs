//! Overview command: account-wide dashboard stats, optionally live

use crate::api::types::DashboardStats;
use crate::cli::output::format_overview;
use crate::cli::{Console, OverviewArgs};
use crate::query::QueryKey;
use crate::session::SessionEvent;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Handle overview command
pub async fn handle_overview(
    args: &OverviewArgs,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    if args.watch {
        return watch_overview(console).await;
    }

    let client = &console.client;
    let stats: DashboardStats = console
        .cache
        .fetch(QueryKey::DashboardStats, || client.dashboard_stats())
        .await?
        .data;

    if args.json {
        Ok(serde_json::to_string_pretty(&stats)?)
    } else {
        Ok(format_overview(&stats))
    }
}

/// Live overview: refetches on the list polling interval until interrupted,
/// the session ends, or the token expires.
async fn watch_overview(console: &Console) -> Result<String, Box<dyn std::error::Error>> {
    let cancel = CancellationToken::new();
    let watcher = console.session.start_watcher(
        Duration::from_secs(console.config.session.watch_interval_seconds),
        cancel.clone(),
    );
    let mut session_events = console.session.subscribe();

    let client = console.client.clone();
    let (poller, mut rx) = console.cache.poll(
        QueryKey::DashboardStats,
        Duration::from_secs(console.config.polling.list_interval_seconds),
        move || {
            let client = client.clone();
            async move { client.dashboard_stats().await }
        },
    );

    render(&rx.borrow_and_update().clone());

    let outcome = loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break "Polling stopped.".to_string();
                }
                render(&rx.borrow_and_update().clone());
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

    drop(poller);
    cancel.cancel();
    let _ = watcher.await;
    Ok(outcome)
}

fn render(snapshot: &crate::query::QuerySnapshot<DashboardStats>) {
    // ANSI clear screen + cursor home
    print!("\x1b[2J\x1b[H");
    match (&snapshot.data, &snapshot.error) {
        (Some(stats), error) => {
            print!("{}", format_overview(stats));
            if snapshot.is_placeholder {
                println!();
                println!("(stale{})", error.as_deref().map(|e| format!(" - {}", e)).unwrap_or_default());
            }
        }
        (None, Some(error)) => println!("Error: {}", error),
        (None, None) => println!("Loading..."),
    }
}
