//! Identity Toolkit REST backend

use crate::auth::backend::AuthBackend;
use crate::auth::types::{AuthResult, User, UserMetadata};
use crate::config::FirebaseConfig;
use crate::error::AuthError;
use async_trait::async_trait;
use serde::Deserialize;

/// Email/password auth against the Identity Toolkit REST API
#[derive(Clone)]
pub struct RestAuthBackend {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl RestAuthBackend {
    /// Create a backend for the project in `config`
    pub fn new(config: &FirebaseConfig, http_client: reqwest::Client) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.settings.auth_base_url(),
            http_client,
        }
    }

    /// `{base}/accounts:{method}?key={api_key}`
    pub(crate) fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, method, self.api_key)
    }

    /// POST to an accounts endpoint and map error bodies to `AuthError`
    async fn post_accounts(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, AuthError> {
        let response = self
            .http_client
            .post(self.endpoint(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::NetworkRequestFailed(e.to_string()))?;

        // Handle error responses first
        if !response.status().is_success() {
            let error_body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| AuthError::NetworkRequestFailed(format!("Failed to parse error: {}", e)))?;
            let error_message = error_body["error"]["message"]
                .as_str()
                .unwrap_or("UNKNOWN_ERROR");
            return Err(AuthError::from_error_code(error_message));
        }

        Ok(response)
    }

    async fn password_request(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        // Validate email (error case first)
        if email.is_empty() {
            return Err(AuthError::InvalidEmail);
        }

        // Validate password (error case first)
        if password.is_empty() {
            return Err(AuthError::InvalidPassword);
        }

        let response = self
            .post_accounts(
                method,
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true
                }),
            )
            .await?;

        let user_data: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthError::NetworkRequestFailed(format!("Invalid sign-in response: {}", e)))?;
        Ok(user_data.into_user())
    }
}

#[async_trait]
impl AuthBackend for RestAuthBackend {
    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, AuthError> {
        let user = self.password_request("signInWithPassword", email, password).await?;
        Ok(AuthResult::password(user, false))
    }

    async fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, AuthError> {
        let user = self.password_request("signUp", email, password).await?;
        Ok(AuthResult::password(user, true))
    }

    async fn send_password_reset_email(&self, email: &str) -> Result<(), AuthError> {
        // Validate email (error case first)
        if email.is_empty() {
            return Err(AuthError::InvalidEmail);
        }

        self.post_accounts(
            "sendOobCode",
            serde_json::json!({
                "requestType": "PASSWORD_RESET",
                "email": email
            }),
        )
        .await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // ID tokens are stateless; dropping them locally ends the session
        Ok(())
    }
}

impl std::fmt::Debug for RestAuthBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestAuthBackend")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Identity Toolkit sign-in / sign-up response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: Option<String>,
}

impl SignInResponse {
    fn into_user(self) -> User {
        let now = chrono::Utc::now();

        // expires_in is in seconds; default to 1 hour
        let lifetime = self
            .expires_in
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(3600);

        User {
            uid: self.local_id,
            email: self.email,
            display_name: self.display_name.filter(|name| !name.is_empty()),
            email_verified: false,
            is_anonymous: false,
            metadata: UserMetadata {
                creation_timestamp: now.timestamp_millis(),
                last_sign_in_timestamp: now.timestamp_millis(),
            },
            id_token: Some(self.id_token),
            refresh_token: Some(self.refresh_token),
            token_expiration: Some(now.timestamp() + lifetime),
        }
    }
}
