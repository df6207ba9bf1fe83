//! Notification channel commands

use crate::api::types::NotificationChannel;
use crate::cli::output::{format_channels_json, format_channels_table};
use crate::cli::{ChannelsDisconnectArgs, ChannelsListArgs, Console};
use crate::query::QueryKey;
use colored::Colorize;

/// Handle channels list command
pub async fn handle_channels_list(
    args: &ChannelsListArgs,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    let client = &console.client;
    let channels: Vec<NotificationChannel> = console
        .cache
        .fetch(QueryKey::Channels, || client.list_channels())
        .await?
        .data;

    if args.json {
        Ok(format_channels_json(&channels))
    } else if channels.is_empty() {
        Ok("No notification channels configured.\nRun `statushawk channels connect-telegram` to add one.".to_string())
    } else {
        Ok(format_channels_table(&channels))
    }
}

/// Handle channels connect-telegram command.
///
/// Connecting happens out-of-band in Telegram; completion is only
/// observable by re-listing the channels afterwards, so the channels key
/// is invalidated before printing the link.
pub async fn handle_connect_telegram(
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    let client = &console.client;
    let channels: Vec<NotificationChannel> = console
        .cache
        .fetch(QueryKey::Channels, || client.list_channels())
        .await?
        .data;

    if let Some(existing) = channels.iter().find(|c| c.provider == "telegram") {
        return Ok(format!(
            "Telegram is already connected as {}.",
            existing.name.bold()
        ));
    }

    let link = console.client.telegram_connect_link().await?;
    console.cache.invalidate(&QueryKey::Channels);

    Ok(format!(
        "Open this link to connect Telegram:\n\n  {}\n\nThen run `statushawk channels list` to confirm.",
        link.bold()
    ))
}

/// Handle channels disconnect command
pub async fn handle_channels_disconnect(
    args: &ChannelsDisconnectArgs,
    console: &Console,
) -> Result<String, Box<dyn std::error::Error>> {
    console.client.delete_channel(args.id).await?;
    console.cache.invalidate(&QueryKey::Channels);
    Ok(format!("Disconnected channel {}", args.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests_support::test_console;

    const TELEGRAM_CHANNEL: &str =
        r#"[{"id":2,"provider":"telegram","name":"Telegram (John)","created_at":"2025-01-10T08:00:00Z"}]"#;

    #[tokio::test]
    async fn test_list_empty_suggests_connect() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/notifications/channels/")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let (console, _dir) = test_console(&server.url());
        let args = ChannelsListArgs { json: false };
        let output = handle_channels_list(&args, &console).await.unwrap();
        assert!(output.contains("connect-telegram"));
    }

    #[tokio::test]
    async fn test_list_renders_channels() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/notifications/channels/")
            .with_status(200)
            .with_body(TELEGRAM_CHANNEL)
            .create_async()
            .await;

        let (console, _dir) = test_console(&server.url());
        let args = ChannelsListArgs { json: false };
        let output = handle_channels_list(&args, &console).await.unwrap();
        assert!(output.contains("telegram"));
    }

    #[tokio::test]
    async fn test_connect_telegram_prints_link() {
        let mut server = mockito::Server::new_async().await;
        let _channels = server
            .mock("GET", "/notifications/channels/")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let link = server
            .mock("GET", "/notifications/telegram-link/")
            .with_status(200)
            .with_body(r#"{"link":"https://t.me/statushawk_bot?start=abc"}"#)
            .create_async()
            .await;

        let (console, _dir) = test_console(&server.url());
        let output = handle_connect_telegram(&console).await.unwrap();

        link.assert_async().await;
        assert!(output.contains("https://t.me/"));
    }

    #[tokio::test]
    async fn test_connect_telegram_already_connected() {
        let mut server = mockito::Server::new_async().await;
        let _channels = server
            .mock("GET", "/notifications/channels/")
            .with_status(200)
            .with_body(TELEGRAM_CHANNEL)
            .create_async()
            .await;
        let link = server
            .mock("GET", "/notifications/telegram-link/")
            .expect(0)
            .create_async()
            .await;

        let (console, _dir) = test_console(&server.url());
        let output = handle_connect_telegram(&console).await.unwrap();

        link.assert_async().await;
        assert!(output.contains("already connected"));
    }

    #[tokio::test]
    async fn test_disconnect_invalidates_channels() {
        let mut server = mockito::Server::new_async().await;
        let list = server
            .mock("GET", "/notifications/channels/")
            .with_status(200)
            .with_body(TELEGRAM_CHANNEL)
            .expect(2)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/notifications/channels/2/")
            .with_status(204)
            .create_async()
            .await;

        let (console, _dir) = test_console(&server.url());
        let args = ChannelsListArgs { json: false };
        handle_channels_list(&args, &console).await.unwrap();

        handle_channels_disconnect(&ChannelsDisconnectArgs { id: 2 }, &console)
            .await
            .unwrap();
        delete.assert_async().await;

        // Invalidated by the mutation: the next list refetches.
        handle_channels_list(&args, &console).await.unwrap();
        list.assert_async().await;
    }
}
