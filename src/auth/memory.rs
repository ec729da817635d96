//! In-memory identity platform
//!
//! Accounts live in a map keyed by email. Failures use the same `AuthError`
//! variants the Identity Toolkit codes map to.

use crate::auth::backend::AuthBackend;
use crate::auth::types::{AuthResult, User, UserMetadata};
use crate::error::AuthError;
use async_trait::async_trait;
use base64::Engine;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Shortest password accepted on sign-up
const MIN_PASSWORD_LEN: usize = 6;

/// Lifetime of issued ID tokens, in seconds
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    password: String,
    created_at_ms: i64,
}

/// Identity platform held in process memory
#[derive(Debug, Default)]
pub struct MemoryAuthBackend {
    accounts: Mutex<HashMap<String, Account>>,
    reset_requests: Mutex<Vec<String>>,
    offline: AtomicBool,
}

impl MemoryAuthBackend {
    /// Create a backend with no accounts
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account up front
    pub fn with_account(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        let account = new_account(password.into());
        self.accounts.get_mut().insert(email.into(), account);
        self
    }

    /// Simulate losing (or regaining) the connection to the platform
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Emails a password reset was requested for, oldest first
    pub async fn password_reset_requests(&self) -> Vec<String> {
        self.reset_requests.lock().await.clone()
    }

    fn check_online(&self) -> Result<(), AuthError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthError::NetworkRequestFailed(
                "identity platform is unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

fn new_account(password: String) -> Account {
    Account {
        uid: uuid::Uuid::new_v4().simple().to_string(),
        password,
        created_at_ms: chrono::Utc::now().timestamp_millis(),
    }
}

fn issue_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn session_for(email: &str, account: &Account) -> User {
    let now = chrono::Utc::now();
    User {
        uid: account.uid.clone(),
        email: Some(email.to_string()),
        display_name: None,
        email_verified: false,
        is_anonymous: false,
        metadata: UserMetadata {
            creation_timestamp: account.created_at_ms,
            last_sign_in_timestamp: now.timestamp_millis(),
        },
        id_token: Some(issue_token()),
        refresh_token: Some(issue_token()),
        token_expiration: Some(now.timestamp() + TOKEN_LIFETIME_SECS),
    }
}

#[async_trait]
impl AuthBackend for MemoryAuthBackend {
    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, AuthError> {
        self.check_online()?;
        if email.is_empty() {
            return Err(AuthError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(AuthError::InvalidPassword);
        }

        let accounts = self.accounts.lock().await;
        let Some(account) = accounts.get(email) else {
            return Err(AuthError::UserNotFound);
        };
        if account.password != password {
            return Err(AuthError::WrongPassword);
        }

        Ok(AuthResult::password(session_for(email, account), false))
    }

    async fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, AuthError> {
        self.check_online()?;
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidPassword);
        }

        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(email) {
            return Err(AuthError::EmailAlreadyInUse);
        }
        let account = new_account(password.to_string());
        let user = session_for(email, &account);
        accounts.insert(email.to_string(), account);

        Ok(AuthResult::password(user, true))
    }

    async fn send_password_reset_email(&self, email: &str) -> Result<(), AuthError> {
        self.check_online()?;
        if email.is_empty() {
            return Err(AuthError::InvalidEmail);
        }
        if !self.accounts.lock().await.contains_key(email) {
            return Err(AuthError::UserNotFound);
        }
        self.reset_requests.lock().await.push(email.to_string());
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }
}
