//! Integration tests for monitor mutations and the cache invalidation they
//! trigger, driven through the command handlers.

use statushawk::api::ApiClient;
use statushawk::cli::monitors::{
    delete_if_confirmed, handle_monitors_list, handle_monitors_toggle,
};
use statushawk::cli::{Console, MonitorsListArgs, MonitorsToggleArgs};
use statushawk::config::{ApiConfig, ConsoleConfig};
use statushawk::query::QueryCache;
use statushawk::session::SessionStore;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn console_for(uri: &str) -> (Console, TempDir) {
    let dir = TempDir::new().unwrap();
    let session = Arc::new(SessionStore::open(dir.path().join("token")));
    let api = ApiConfig {
        base_url: uri.to_string(),
        timeout_seconds: 5,
    };
    let client = ApiClient::new(&api, Arc::clone(&session)).unwrap();
    let config = ConsoleConfig {
        api,
        ..Default::default()
    };
    (
        Console {
            config,
            session,
            client,
            cache: Arc::new(QueryCache::new()),
        },
        dir,
    )
}

fn monitor_body(id: u64, is_active: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": "prod",
        "url": "https://example.com",
        "interval": 30,
        "monitor_type": "HTTP",
        "status": "UP",
        "is_active": is_active,
        "created_at": "2025-01-15T10:00:00Z"
    })
}

#[tokio::test]
async fn test_toggle_patches_and_invalidates_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/monitors/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(monitor_body(7, true)))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/monitors/7/"))
        .and(body_json(serde_json::json!({"is_active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(monitor_body(7, false)))
        .expect(1)
        .mount(&server)
        .await;

    // The list endpoint must be hit twice: once before the toggle and once
    // after, because the mutation invalidates every monitors page.
    Mock::given(method("GET"))
        .and(path("/monitors/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 1, "next": null, "previous": null, "results": [monitor_body(7, true)]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let (console, _dir) = console_for(&server.uri());
    let list_args = MonitorsListArgs {
        page: 1,
        json: false,
    };

    handle_monitors_list(&list_args, &console).await.unwrap();

    let output = handle_monitors_toggle(&MonitorsToggleArgs { id: 7 }, &console)
        .await
        .unwrap();
    assert!(output.contains("paused"));

    handle_monitors_list(&list_args, &console).await.unwrap();
}

#[tokio::test]
async fn test_delete_without_confirmation_issues_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let (console, _dir) = console_for(&server.uri());
    let output = delete_if_confirmed(&console, 3, false).await.unwrap();
    assert!(output.contains("Aborted"));
}

#[tokio::test]
async fn test_delete_confirmed_removes_and_invalidates() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/monitors/3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/monitors/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 0, "next": null, "previous": null, "results": []
        })))
        .expect(2)
        .mount(&server)
        .await;

    let (console, _dir) = console_for(&server.uri());
    let list_args = MonitorsListArgs {
        page: 1,
        json: false,
    };

    handle_monitors_list(&list_args, &console).await.unwrap();
    delete_if_confirmed(&console, 3, true).await.unwrap();
    handle_monitors_list(&list_args, &console).await.unwrap();
}
