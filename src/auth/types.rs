//! Authentication types

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// User metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Timestamp when user was created (Unix timestamp in milliseconds)
    pub creation_timestamp: i64,

    /// Timestamp of last sign-in (Unix timestamp in milliseconds)
    pub last_sign_in_timestamp: i64,
}

/// Authenticated session of one user account
///
/// Owned by the auth backend; shared as `Arc<User>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique Firebase user ID
    pub uid: String,

    /// Email address (if available)
    pub email: Option<String>,

    /// Display name (if available)
    pub display_name: Option<String>,

    /// Whether email is verified
    pub email_verified: bool,

    /// Whether user is anonymous
    pub is_anonymous: bool,

    /// User metadata
    pub metadata: UserMetadata,

    /// ID token (JWT) - internal use
    #[serde(skip)]
    pub(crate) id_token: Option<String>,

    /// Refresh token - internal use
    #[serde(skip)]
    pub(crate) refresh_token: Option<String>,

    /// Token expiration timestamp (seconds since epoch) - internal use
    #[serde(skip)]
    pub(crate) token_expiration: Option<i64>,
}

impl User {
    /// The ID token, unless it is known to have expired
    pub fn id_token(&self) -> Option<&str> {
        let token = self.id_token.as_deref()?;
        match self.token_expiration {
            Some(expiration) if chrono::Utc::now().timestamp() >= expiration => None,
            _ => Some(token),
        }
    }

    /// Whether a refresh token was issued for this session
    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }
}

/// Additional information about the sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalUserInfo {
    /// Provider ID ("password" for email/password accounts)
    pub provider_id: String,
    /// Whether the account was created by this call
    pub is_new_user: bool,
}

/// Result of a successful sign-in or sign-up
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// The signed-in user
    pub user: Arc<User>,
    /// Additional information about the sign-in
    pub additional_user_info: Option<AdditionalUserInfo>,
}

impl AuthResult {
    /// Result for an email/password account
    pub(crate) fn password(user: User, is_new_user: bool) -> Self {
        Self {
            user: Arc::new(user),
            additional_user_info: Some(AdditionalUserInfo {
                provider_id: "password".to_string(),
                is_new_user,
            }),
        }
    }
}
