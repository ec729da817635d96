//! Auth backend seam

use crate::auth::types::AuthResult;
use crate::error::AuthError;
use async_trait::async_trait;

/// Operations the auth facade forwards to the identity platform
///
/// Implementations own the account data and decide every outcome; the
/// facade only records the resulting session.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Sign in an existing email/password account
    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, AuthError>;

    /// Create an email/password account and sign it in
    async fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthResult, AuthError>;

    /// Send a password reset email
    async fn send_password_reset_email(&self, email: &str) -> Result<(), AuthError>;

    /// End the current session on the platform side
    async fn sign_out(&self) -> Result<(), AuthError>;
}
