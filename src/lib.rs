//! Firebase bridge
//!
//! Thin access layer over Firebase: one initialization step, then a
//! document service (`get` / merge `set`) and an email/password auth
//! service that relays session changes.
//!
//! # Example
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use firebase_bridge::{initialize, FirebaseConfig};
//!
//! let services = initialize(FirebaseConfig::new("YOUR_API_KEY", "your-project-id")).await?;
//! let result = services.auth.sign_in("user@example.com", "password").await?;
//! println!("Signed in: {}", result.user.uid);
//!
//! if let Some(profile) = services.db.get("usuarios", &result.user.uid).await? {
//!     println!("{:?}", profile);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod readiness;

// Auth module
pub mod auth {
    //! Firebase Authentication

    #[allow(clippy::module_inception)]
    pub mod auth;
    pub mod backend;
    pub mod memory;
    pub mod rest;
    pub mod session;
    pub mod types;

    pub use auth::{Auth, AuthStateStream};
    pub use backend::AuthBackend;
    pub use memory::MemoryAuthBackend;
    pub use rest::RestAuthBackend;
    pub use session::{SessionReceiver, SessionState};
    pub use types::{AdditionalUserInfo, AuthResult, User, UserMetadata};
}

// Firestore module
pub mod firestore;

// Re-exports for convenience
pub use app::{initialize, App, Services};
pub use config::{FirebaseConfig, Settings};
pub use error::{AuthError, FetchError, FirebaseError, FirestoreError, WriteError};
pub use readiness::{Readiness, READY_DELAY};

// Auth re-exports
pub use auth::{Auth, AuthBackend, AuthResult, MemoryAuthBackend, User};

// Firestore re-exports
pub use firestore::{Database, DocumentBackend, DocumentData, MemoryDocumentStore, LAST_UPDATED_FIELD};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types_exist() {
        // Basic smoke test
        let _err: FirebaseError = AuthError::InvalidEmail.into();
        let _err: FirebaseError = FirestoreError::NotFound.into();
    }
}
