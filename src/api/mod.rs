//! API client for the StatusHawk backend.
//!
//! A single configured [`ApiClient`] owns the pooled HTTP client and the
//! fixed base URL; every data-access function goes through it. The session
//! token is resolved per request from the [`SessionStore`], never cached in
//! shared default headers, so the token and the outgoing authorization
//! header cannot drift apart.
//!
//! An HTTP 401 from any endpoint invalidates the session globally (clearing
//! the persisted token and broadcasting [`SessionEvent::Expired`]) exactly
//! once, regardless of which call site issued the request.
//!
//! [`SessionEvent::Expired`]: crate::session::SessionEvent::Expired

mod accounts;
mod error;
mod monitors;
mod notifications;
pub mod types;

pub use accounts::{LoginRequest, SignupRequest};
pub use error::ApiError;

use crate::config::ApiConfig;
use crate::session::SessionStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client wrapper with a fixed base endpoint.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a client against the configured base URL.
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds,
            session,
        })
    }

    /// Create a client with a custom HTTP client (for testing).
    pub fn with_client(
        config: &ApiConfig,
        session: Arc<SessionStore>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds,
            session,
        }
    }

    /// The session store this client resolves tokens from.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the current token (if any) and send, translating transport
    /// failures and intercepting authentication failures.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let request = match self.session.token() {
            Some(token) => request.header("Authorization", format!("Token {}", token)),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_seconds))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            // Global logout: fires at most once per expired session and
            // cannot recurse, since no further request is issued here.
            self.session.invalidate();
            return Err(ApiError::Unauthorized);
        }

        Ok(response)
    }

    async fn expect_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: first_field_error(&body)
                    .unwrap_or_else(|| summarize_body(&body)),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn expect_no_content(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: summarize_body(&body),
            });
        }
        Ok(())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.http.get(self.url(path))).await?;
        Self::expect_json(response).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.http.post(self.url(path)).json(body)).await?;
        Self::expect_json(response).await
    }

    pub(crate) async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(self.http.patch(self.url(path)).json(body)).await?;
        Self::expect_json(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send(self.http.delete(self.url(path))).await?;
        Self::expect_no_content(response).await
    }
}

/// Pick the first field error out of a DRF-style validation body, e.g.
/// `{"email": ["user with this email already exists."]}`.
fn first_field_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let map = value.as_object()?;
    for key in ["email", "password", "username", "url", "name", "detail", "non_field_errors"] {
        match map.get(key) {
            Some(serde_json::Value::Array(errors)) => {
                if let Some(first) = errors.first().and_then(|e| e.as_str()) {
                    return Some(first.to_string());
                }
            }
            Some(serde_json::Value::String(message)) => return Some(message.clone()),
            _ => {}
        }
    }
    None
}

fn summarize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "request failed".to_string();
    }
    if trimmed.len() <= 200 {
        return trimmed.to_string();
    }
    // Bodies are arbitrary (proxy HTML, localized text); cut on a char
    // boundary, never mid-codepoint.
    let mut cut = 200;
    while !trimmed.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &trimmed[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use tempfile::TempDir;

    pub(crate) fn test_client(base_url: String) -> (ApiClient, TempDir) {
        let dir = TempDir::new().unwrap();
        let session = Arc::new(SessionStore::open(dir.path().join("token")));
        let config = ApiConfig {
            base_url,
            timeout_seconds: 5,
        };
        (
            ApiClient::new(&config, session).unwrap(),
            dir,
        )
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let (client, _dir) = test_client("http://localhost:8000/api/v1/".to_string());
        assert_eq!(client.url("/monitors/"), "http://localhost:8000/api/v1/monitors/");
    }

    #[test]
    fn test_first_field_error_array() {
        let body = r#"{"email": ["user with this email already exists."]}"#;
        assert_eq!(
            first_field_error(body).unwrap(),
            "user with this email already exists."
        );
    }

    #[test]
    fn test_first_field_error_prefers_email_over_password() {
        let body = r#"{"password": ["too short"], "email": ["taken"]}"#;
        assert_eq!(first_field_error(body).unwrap(), "taken");
    }

    #[test]
    fn test_first_field_error_detail_string() {
        let body = r#"{"detail": "Not found."}"#;
        assert_eq!(first_field_error(body).unwrap(), "Not found.");
    }

    #[test]
    fn test_first_field_error_non_json() {
        assert!(first_field_error("<html>502</html>").is_none());
    }

    #[test]
    fn test_summarize_body_truncates_long_bodies() {
        let body = "a".repeat(300);
        let summary = summarize_body(&body);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.len(), 203);
    }

    #[test]
    fn test_summarize_body_multibyte_near_limit() {
        // 199 ASCII bytes followed by two-byte chars puts a codepoint
        // straddling the 200-byte cut.
        let body = format!("{}{}", "a".repeat(199), "é".repeat(20));
        let summary = summarize_body(&body);
        assert!(summary.ends_with("..."));
        assert!(summary.starts_with(&"a".repeat(199)));
    }

    #[test]
    fn test_summarize_body_short_multibyte_untouched() {
        let body = "département introuvable";
        assert_eq!(summarize_body(body), body);
    }

    #[tokio::test]
    async fn test_401_invalidates_session() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/monitors/")
            .with_status(401)
            .create_async()
            .await;

        let (client, _dir) = test_client(server.url());
        client.session().login("stale-token").unwrap();
        let mut events = client.session().subscribe();

        let result: Result<serde_json::Value, _> = client.get_json("/monitors/").await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(!client.session().is_authenticated());
        assert_eq!(
            events.try_recv().unwrap(),
            crate::session::SessionEvent::Expired
        );
    }

    #[tokio::test]
    async fn test_requests_carry_token_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/monitors/dashboard_stats")
            .match_header("authorization", "Token abc")
            .with_status(200)
            .with_body(r#"{"total":0,"active":0,"up":0,"down":0,"avg_latency":0.0,"recent_failures":[]}"#)
            .create_async()
            .await;

        let (client, _dir) = test_client(server.url());
        client.session().login("abc").unwrap();

        let stats: types::DashboardStats =
            client.get_json("/monitors/dashboard_stats").await.unwrap();

        mock.assert_async().await;
        assert_eq!(stats.total, 0);
    }

    #[tokio::test]
    async fn test_unauthenticated_requests_omit_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/monitors/dashboard_stats")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"total":1,"active":1,"up":1,"down":0,"avg_latency":12.5,"recent_failures":[]}"#)
            .create_async()
            .await;

        let (client, _dir) = test_client(server.url());
        let stats: types::DashboardStats =
            client.get_json("/monitors/dashboard_stats").await.unwrap();

        mock.assert_async().await;
        assert_eq!(stats.up, 1);
    }

    #[tokio::test]
    async fn test_network_error_classified() {
        let (client, _dir) = test_client("http://127.0.0.1:1".to_string());
        let result: Result<serde_json::Value, _> = client.get_json("/monitors/").await;
        assert!(matches!(result, Err(ApiError::Network(_))));
    }
}
