//! Auth facade
//!
//! Forwards credentials to the `AuthBackend`, records the resulting session
//! and relays session changes to subscribers. There is no local state
//! machine: the backend decides every outcome.

use crate::auth::backend::AuthBackend;
use crate::auth::session::SessionState;
use crate::auth::types::{AuthResult, User};
use crate::error::AuthError;
use async_stream::stream;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Stream of session states, see [`Auth::auth_state_changes`]
pub type AuthStateStream = Pin<Box<dyn Stream<Item = Option<Arc<User>>> + Send>>;

/// Email/password authentication service
///
/// Cheap to clone; clones share the backend and the session.
#[derive(Clone)]
pub struct Auth {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    backend: Arc<dyn AuthBackend>,
    session: SessionState,
}

impl Auth {
    pub(crate) fn new(backend: Arc<dyn AuthBackend>, session: SessionState) -> Self {
        Self {
            inner: Arc::new(AuthInner { backend, session }),
        }
    }

    /// The underlying platform auth handle
    pub fn handle(&self) -> &Arc<dyn AuthBackend> {
        &self.inner.backend
    }

    /// Get the current signed-in user
    ///
    /// Returns None if no user is currently signed in.
    pub fn current_user(&self) -> Option<Arc<User>> {
        self.inner.session.current()
    }

    /// Sign in with email and password
    ///
    /// Backend errors are returned unmodified.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// use firebase_bridge::{initialize, FirebaseConfig};
    ///
    /// let services = initialize(FirebaseConfig::new("YOUR_API_KEY", "your-project")).await?;
    /// let result = services.auth.sign_in("user@example.com", "password").await?;
    /// println!("Signed in: {}", result.user.uid);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn sign_in(
        &self,
        email: impl AsRef<str>,
        password: impl AsRef<str>,
    ) -> Result<AuthResult, AuthError> {
        let email = email.as_ref();
        let result = match self
            .inner
            .backend
            .sign_in_with_email_and_password(email, password.as_ref())
            .await
        {
            Err(e) => {
                error!(email, error = %e, "sign-in failed");
                return Err(e);
            }
            Ok(result) => result,
        };

        info!(email, uid = %result.user.uid, "signed in");
        self.inner.session.publish(Some(Arc::clone(&result.user)));
        Ok(result)
    }

    /// Create a new email/password account and sign it in
    pub async fn create_user_with_email_and_password(
        &self,
        email: impl AsRef<str>,
        password: impl AsRef<str>,
    ) -> Result<AuthResult, AuthError> {
        let email = email.as_ref();
        let result = match self
            .inner
            .backend
            .create_user_with_email_and_password(email, password.as_ref())
            .await
        {
            Err(e) => {
                error!(email, error = %e, "account creation failed");
                return Err(e);
            }
            Ok(result) => result,
        };

        info!(email, uid = %result.user.uid, "account created");
        self.inner.session.publish(Some(Arc::clone(&result.user)));
        Ok(result)
    }

    /// Send a password reset email
    ///
    /// Does not change the current session.
    pub async fn send_password_reset_email(&self, email: impl AsRef<str>) -> Result<(), AuthError> {
        let email = email.as_ref();
        if let Err(e) = self.inner.backend.send_password_reset_email(email).await {
            error!(email, error = %e, "password reset request failed");
            return Err(e);
        }
        info!(email, "password reset email sent");
        Ok(())
    }

    /// Sign out the current user
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        if let Err(e) = self.inner.backend.sign_out().await {
            error!(error = %e, "sign-out failed");
            return Err(e);
        }
        info!("signed out");
        self.inner.session.publish(None);
        Ok(())
    }

    /// Register a session change callback
    ///
    /// `callback` runs once right away with the current session (or None),
    /// then exactly once for every later sign-in, account creation or
    /// sign-out, in order.
    /// There is no way to unregister; notifications stop when every handle
    /// to this app's session is dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_auth_change<F>(&self, callback: F)
    where
        F: Fn(Option<Arc<User>>) + Send + Sync + 'static,
    {
        let (initial, mut rx) = self.inner.session.subscribe();
        callback(initial);

        tokio::spawn(async move {
            while let Some(user) = rx.recv().await {
                callback(user);
            }
            debug!("auth listener finished");
        });
    }

    /// Subscribe to authentication state changes
    ///
    /// The stream immediately yields the current user state upon
    /// subscription, then every later change.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example(auth: firebase_bridge::Auth) {
    /// use futures::StreamExt;
    ///
    /// let mut stream = auth.auth_state_changes();
    /// while let Some(user) = stream.next().await {
    ///     match user {
    ///         Some(u) => println!("User signed in: {}", u.uid),
    ///         None => println!("User signed out"),
    ///     }
    /// }
    /// # }
    /// ```
    pub fn auth_state_changes(&self) -> AuthStateStream {
        let (initial_user, mut rx) = self.inner.session.subscribe();

        Box::pin(stream! {
            // Yield initial state first
            yield initial_user;

            // Then yield all future state changes
            while let Some(user) = rx.recv().await {
                yield user;
            }
        })
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("session", &self.inner.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::memory::MemoryAuthBackend;
    use futures::StreamExt;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn auth_with(backend: MemoryAuthBackend) -> Auth {
        Auth::new(Arc::new(backend), SessionState::new())
    }

    fn ana() -> MemoryAuthBackend {
        MemoryAuthBackend::new().with_account("ana@example.com", "secreto1")
    }

    #[tokio::test]
    async fn test_current_user_initially_none() {
        let auth = auth_with(ana());
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_sets_current_user() {
        let auth = auth_with(ana());
        let result = auth.sign_in("ana@example.com", "secreto1").await.unwrap();

        let current = auth.current_user().unwrap();
        assert_eq!(current.uid, result.user.uid);
        assert!(Arc::ptr_eq(&current, &result.user));
    }

    #[tokio::test]
    async fn test_sign_out_clears_user() {
        let auth = auth_with(ana());
        auth.sign_in("ana@example.com", "secreto1").await.unwrap();
        assert!(auth.current_user().is_some());

        auth.sign_out().await.unwrap();
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_previous_session() {
        let auth = auth_with(ana());
        auth.sign_in("ana@example.com", "secreto1").await.unwrap();

        let result = auth.sign_in("ana@example.com", "wrong").await;
        assert!(matches!(result, Err(AuthError::WrongPassword)));
        assert_eq!(
            auth.current_user().unwrap().email.as_deref(),
            Some("ana@example.com")
        );
    }

    #[tokio::test]
    async fn test_sign_in_error_passes_through_unmodified() {
        let backend = ana();
        backend.set_offline(true);
        let auth = auth_with(backend);

        let result = auth.sign_in("ana@example.com", "secreto1").await;
        assert_eq!(
            result.unwrap_err(),
            AuthError::NetworkRequestFailed("identity platform is unreachable".to_string())
        );
    }

    #[tokio::test]
    async fn test_password_reset_does_not_affect_current_user() {
        let auth = auth_with(ana());
        auth.sign_in("ana@example.com", "secreto1").await.unwrap();

        auth.send_password_reset_email("ana@example.com").await.unwrap();
        assert!(auth.current_user().is_some());
    }

    #[tokio::test]
    async fn test_on_auth_change_initial_then_each_change() {
        let auth = auth_with(ana());
        let (tx, mut rx) = mpsc::unbounded_channel();
        auth.on_auth_change(move |user| {
            let _ = tx.send(user.map(|u| u.uid.clone()));
        });

        // Initial state is delivered synchronously
        assert_eq!(rx.try_recv().unwrap(), None);

        let signed_in = auth.sign_in("ana@example.com", "secreto1").await.unwrap();
        auth.sign_out().await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), Some(signed_in.user.uid.clone()));
        assert_eq!(rx.recv().await.unwrap(), None);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_on_auth_change_ignores_failed_sign_in() {
        let auth = auth_with(ana());
        let (tx, mut rx) = mpsc::unbounded_channel();
        auth.on_auth_change(move |user| {
            let _ = tx.send(user.is_some());
        });
        assert!(!rx.try_recv().unwrap());

        let _ = auth.sign_in("ana@example.com", "wrong").await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_auth_state_changes_initial() {
        let auth = auth_with(ana());
        let mut stream = auth.auth_state_changes();

        // Should immediately yield None (no user signed in)
        let initial = stream.next().await;
        assert!(initial.is_some());
        assert!(initial.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_auth_state_changes_on_sign_in_and_out() {
        let auth = auth_with(ana());
        let mut stream = auth.auth_state_changes();
        let _ = stream.next().await;

        auth.sign_in("ana@example.com", "secreto1").await.unwrap();
        let next = stream.next().await.unwrap();
        assert_eq!(next.unwrap().email.as_deref(), Some("ana@example.com"));

        auth.sign_out().await.unwrap();
        assert!(stream.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_user_publishes_session() {
        let auth = auth_with(MemoryAuthBackend::new());
        let result = auth
            .create_user_with_email_and_password("nuevo@example.com", "secreto1")
            .await
            .unwrap();
        assert_eq!(auth.current_user().unwrap().uid, result.user.uid);
    }

    #[tokio::test]
    async fn test_on_auth_change_burst_is_lossless() {
        let auth = auth_with(ana());
        let (tx, mut rx) = mpsc::unbounded_channel();
        auth.on_auth_change(move |user| {
            let _ = tx.send(user.is_some());
        });

        for _ in 0..15 {
            auth.sign_in("ana@example.com", "secreto1").await.unwrap();
            auth.sign_out().await.unwrap();
        }

        // Initial state plus every change, alternating
        let mut seen = Vec::new();
        for _ in 0..31 {
            seen.push(rx.recv().await.unwrap());
        }
        assert!(!seen[0]);
        for (i, signed_in) in seen.iter().enumerate().skip(1) {
            assert_eq!(*signed_in, i % 2 == 1, "notification {}", i);
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_auth_state_changes_burst_is_lossless() {
        let auth = auth_with(ana());
        let mut stream = auth.auth_state_changes();

        for _ in 0..15 {
            auth.sign_in("ana@example.com", "secreto1").await.unwrap();
            auth.sign_out().await.unwrap();
        }

        assert!(stream.next().await.unwrap().is_none());
        for _ in 0..15 {
            assert!(stream.next().await.unwrap().is_some());
            assert!(stream.next().await.unwrap().is_none());
        }
    }
}
