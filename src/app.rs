//! Firebase App
//!
//! The App is the initialized platform context: it owns the configuration,
//! the shared HTTP client, the session and the readiness flag, and hands
//! out the two services built on them.

use crate::auth::backend::AuthBackend;
use crate::auth::rest::RestAuthBackend;
use crate::auth::session::SessionState;
use crate::auth::Auth;
use crate::config::FirebaseConfig;
use crate::error::FirebaseError;
use crate::firestore::backend::DocumentBackend;
use crate::firestore::database::Database;
use crate::firestore::rest::RestDocumentStore;
use crate::readiness::{Readiness, READY_DELAY};
use std::sync::Arc;
use tracing::info;

/// Initialized Firebase platform
///
/// Cheap to clone; clones share every service.
#[derive(Clone, Debug)]
pub struct App {
    inner: Arc<AppInner>,
}

#[derive(Debug)]
struct AppInner {
    config: FirebaseConfig,
    database: Database,
    auth: Auth,
}

/// The two services of an initialized App
#[derive(Clone, Debug)]
pub struct Services {
    /// Document read/write service
    pub db: Database,
    /// Authentication service
    pub auth: Auth,
}

fn validate(config: &FirebaseConfig) -> Result<(), FirebaseError> {
    // Validate options (error case first)
    if config.api_key.is_empty() {
        return Err(FirebaseError::ApiKeyNotConfigured);
    }
    if config.project_id.is_empty() {
        return Err(FirebaseError::internal("Project ID cannot be empty"));
    }
    Ok(())
}

impl App {
    /// Initialize the platform against the Firebase REST APIs
    ///
    /// The returned App reports ready `READY_DELAY` after this call.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// use firebase_bridge::{App, FirebaseConfig};
    ///
    /// let app = App::initialize(FirebaseConfig::new("YOUR_API_KEY", "your-project-id")).await?;
    /// let db = app.database();
    /// # Ok(())
    /// # }
    /// ```
    pub async fn initialize(config: FirebaseConfig) -> Result<Self, FirebaseError> {
        validate(&config)?;

        let http_client = reqwest::Client::builder()
            .timeout(config.settings.request_timeout)
            .build()?;
        let session = SessionState::new();
        let documents = Arc::new(RestDocumentStore::new(&config, http_client.clone(), session.clone()));
        let accounts = Arc::new(RestAuthBackend::new(&config, http_client));

        Ok(Self::assemble(config, documents, accounts, session))
    }

    /// Initialize the platform with caller-supplied backends
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_backends(
        config: FirebaseConfig,
        documents: Arc<dyn DocumentBackend>,
        accounts: Arc<dyn AuthBackend>,
    ) -> Result<Self, FirebaseError> {
        validate(&config)?;
        Ok(Self::assemble(config, documents, accounts, SessionState::new()))
    }

    fn assemble(
        config: FirebaseConfig,
        documents: Arc<dyn DocumentBackend>,
        accounts: Arc<dyn AuthBackend>,
        session: SessionState,
    ) -> Self {
        let readiness = Readiness::after(READY_DELAY);
        info!(
            project_id = %config.project_id,
            database_id = %config.database_id,
            "firebase app initialized"
        );

        App {
            inner: Arc::new(AppInner {
                database: Database::new(documents, readiness),
                auth: Auth::new(accounts, session),
                config,
            }),
        }
    }

    /// The document service
    pub fn database(&self) -> Database {
        self.inner.database.clone()
    }

    /// The authentication service
    pub fn auth(&self) -> Auth {
        self.inner.auth.clone()
    }

    /// The configuration this App was initialized with
    pub fn config(&self) -> &FirebaseConfig {
        &self.inner.config
    }

    /// Split into the two services
    pub fn into_services(self) -> Services {
        Services {
            db: self.database(),
            auth: self.auth(),
        }
    }
}

/// Initialize the platform and return its two services
///
/// # Example
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use firebase_bridge::{initialize, FirebaseConfig};
///
/// let services = initialize(FirebaseConfig::new("YOUR_API_KEY", "your-project-id")).await?;
/// services.db.wait_until_ready().await;
/// # Ok(())
/// # }
/// ```
pub async fn initialize(config: FirebaseConfig) -> Result<Services, FirebaseError> {
    Ok(App::initialize(config).await?.into_services())
}
