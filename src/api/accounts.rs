//! Account endpoints: login and signup.

use super::types::AuthResponse;
use super::{ApiClient, ApiError};
use serde::Serialize;

/// Credentials for `POST /accounts/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `POST /accounts/signup`.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password2: String,
}

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// Required fields are validated before any network call; the returned
    /// token is NOT stored here - callers store it through the session store.
    pub async fn login(&self, request: &LoginRequest) -> Result<String, ApiError> {
        if request.email.is_empty() || request.password.is_empty() {
            return Err(ApiError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let response: AuthResponse = self.post_json("/accounts/login", request).await?;
        response.into_token()
    }

    /// Create an account. Returns the token when the backend issues one
    /// immediately, otherwise `None` (caller falls back to a login step).
    pub async fn signup(&self, request: &SignupRequest) -> Result<Option<String>, ApiError> {
        if request.email.is_empty()
            || request.first_name.is_empty()
            || request.last_name.is_empty()
            || request.password.is_empty()
        {
            return Err(ApiError::Validation("all fields are required".to_string()));
        }
        if request.password != request.password2 {
            return Err(ApiError::Validation("Passwords do not match".to_string()));
        }

        let response: AuthResponse = self.post_json("/accounts/signup", request).await?;
        Ok(response.into_token().ok())
    }
}
