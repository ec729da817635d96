//! Static platform configuration
//!
//! `FirebaseConfig` identifies the backend project the same way a web app's
//! `firebaseConfig` object does. `Settings` carries the transport knobs.

use crate::error::FirebaseError;
use serde::Deserialize;
use std::time::Duration;

/// Default Firestore REST host
pub const DEFAULT_FIRESTORE_HOST: &str = "firestore.googleapis.com";

/// Default Identity Toolkit REST host
pub const DEFAULT_AUTH_HOST: &str = "identitytoolkit.googleapis.com";

/// Default database ID of a project
pub const DEFAULT_DATABASE_ID: &str = "(default)";

/// Project configuration record
///
/// Immutable once handed to `App::initialize`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirebaseConfig {
    /// Web API key
    pub api_key: String,
    /// Auth domain (e.g., "my-project.firebaseapp.com")
    pub auth_domain: Option<String>,
    /// Google Cloud project ID
    pub project_id: String,
    /// Default storage bucket
    pub storage_bucket: Option<String>,
    /// Cloud Messaging sender ID
    pub messaging_sender_id: Option<String>,
    /// App ID
    pub app_id: Option<String>,
    /// Firestore database ID
    pub database_id: String,
    /// Transport settings
    pub settings: Settings,
}

impl FirebaseConfig {
    /// Create a configuration with the two required identifiers
    ///
    /// # Example
    /// ```
    /// use firebase_bridge::FirebaseConfig;
    ///
    /// let config = FirebaseConfig::new("YOUR_API_KEY", "your-project-id")
    ///     .with_auth_domain("your-project-id.firebaseapp.com");
    /// assert_eq!(config.database_id, "(default)");
    /// ```
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            auth_domain: None,
            project_id: project_id.into(),
            storage_bucket: None,
            messaging_sender_id: None,
            app_id: None,
            database_id: DEFAULT_DATABASE_ID.to_string(),
            settings: Settings::default(),
        }
    }

    /// Read `FIREBASE_API_KEY` and `FIREBASE_PROJECT_ID` from the environment
    ///
    /// Returns None when either variable is missing.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("FIREBASE_API_KEY").ok()?;
        let project_id = std::env::var("FIREBASE_PROJECT_ID").ok()?;
        Some(Self::new(api_key, project_id))
    }

    /// Parse a web app `firebaseConfig` object
    ///
    /// Keys are the camelCase names from the Firebase console
    /// (`apiKey`, `projectId`, `authDomain`, ...). Unknown keys such as
    /// `measurementId` are ignored.
    ///
    /// # Example
    /// ```
    /// use firebase_bridge::FirebaseConfig;
    ///
    /// let config = FirebaseConfig::from_json(r#"{"apiKey": "k", "projectId": "p"}"#).unwrap();
    /// assert_eq!(config.project_id, "p");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, FirebaseError> {
        let web: WebConfig = serde_json::from_str(json)?;
        let mut config = Self::new(web.api_key, web.project_id);
        config.auth_domain = web.auth_domain;
        config.storage_bucket = web.storage_bucket;
        config.messaging_sender_id = web.messaging_sender_id;
        config.app_id = web.app_id;
        Ok(config)
    }

    /// Set the auth domain
    pub fn with_auth_domain(mut self, auth_domain: impl Into<String>) -> Self {
        self.auth_domain = Some(auth_domain.into());
        self
    }

    /// Set the storage bucket
    pub fn with_storage_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.storage_bucket = Some(bucket.into());
        self
    }

    /// Set the messaging sender ID
    pub fn with_messaging_sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.messaging_sender_id = Some(sender_id.into());
        self
    }

    /// Set the app ID
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Use a named Firestore database instead of `(default)`
    pub fn with_database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Replace the transport settings
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// `projects/{project_id}/databases/{database_id}`
    pub fn database_path(&self) -> String {
        format!("projects/{}/databases/{}", self.project_id, self.database_id)
    }
}

/// `firebaseConfig` as shown in the Firebase console
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebConfig {
    api_key: String,
    project_id: String,
    auth_domain: Option<String>,
    storage_bucket: Option<String>,
    messaging_sender_id: Option<String>,
    app_id: Option<String>,
}

/// Transport settings for the REST backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Host of the Firestore backend
    ///
    /// Default: "firestore.googleapis.com"
    pub firestore_host: String,

    /// Host of the Identity Toolkit backend
    ///
    /// Default: "identitytoolkit.googleapis.com"
    pub auth_host: String,

    /// Whether to use TLS for communication
    ///
    /// Default: true
    pub ssl_enabled: bool,

    /// Per-request timeout of the shared HTTP client
    ///
    /// Default: 30 seconds
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            firestore_host: DEFAULT_FIRESTORE_HOST.to_string(),
            auth_host: DEFAULT_AUTH_HOST.to_string(),
            ssl_enabled: true,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Settings {
    /// Settings pointing both services at a local emulator suite
    ///
    /// The auth emulator serves Identity Toolkit under
    /// `{host}/identitytoolkit.googleapis.com`.
    pub fn emulator(firestore_host: impl Into<String>, auth_host: impl Into<String>) -> Self {
        Self {
            firestore_host: firestore_host.into(),
            auth_host: format!("{}/{}", auth_host.into(), DEFAULT_AUTH_HOST),
            ssl_enabled: false,
            ..Self::default()
        }
    }

    fn scheme(&self) -> &'static str {
        if self.ssl_enabled {
            "https"
        } else {
            "http"
        }
    }

    /// Base URL of the Firestore REST API (`https://firestore.googleapis.com/v1`)
    pub fn firestore_base_url(&self) -> String {
        format!("{}://{}/v1", self.scheme(), self.firestore_host)
    }

    /// Base URL of the Identity Toolkit REST API
    pub fn auth_base_url(&self) -> String {
        format!("{}://{}/v1", self.scheme(), self.auth_host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_urls() {
        let settings = Settings::default();
        assert_eq!(settings.firestore_base_url(), "https://firestore.googleapis.com/v1");
        assert_eq!(settings.auth_base_url(), "https://identitytoolkit.googleapis.com/v1");
    }

    #[test]
    fn test_emulator_settings_urls() {
        let settings = Settings::emulator("localhost:8080", "localhost:9099");
        assert_eq!(settings.firestore_base_url(), "http://localhost:8080/v1");
        assert_eq!(
            settings.auth_base_url(),
            "http://localhost:9099/identitytoolkit.googleapis.com/v1"
        );
    }

    #[test]
    fn test_database_path() {
        let config = FirebaseConfig::new("key", "test-project");
        assert_eq!(config.database_path(), "projects/test-project/databases/(default)");

        let named = config.with_database_id("tienda");
        assert_eq!(named.database_path(), "projects/test-project/databases/tienda");
    }

    #[test]
    fn test_builder_sets_optional_fields() {
        let config = FirebaseConfig::new("key", "p")
            .with_auth_domain("p.firebaseapp.com")
            .with_storage_bucket("p.appspot.com")
            .with_messaging_sender_id("1234")
            .with_app_id("1:1234:web:abcd");
        assert_eq!(config.auth_domain.as_deref(), Some("p.firebaseapp.com"));
        assert_eq!(config.storage_bucket.as_deref(), Some("p.appspot.com"));
        assert_eq!(config.messaging_sender_id.as_deref(), Some("1234"));
        assert_eq!(config.app_id.as_deref(), Some("1:1234:web:abcd"));
    }

    #[test]
    fn test_from_json_web_config() {
        let config = FirebaseConfig::from_json(
            r#"{
                "apiKey": "AIza-test",
                "authDomain": "p.firebaseapp.com",
                "projectId": "p",
                "storageBucket": "p.appspot.com",
                "messagingSenderId": "1234",
                "appId": "1:1234:web:abcd",
                "measurementId": "G-XYZ"
            }"#,
        )
        .unwrap();
        assert_eq!(config.api_key, "AIza-test");
        assert_eq!(config.project_id, "p");
        assert_eq!(config.auth_domain.as_deref(), Some("p.firebaseapp.com"));
        assert_eq!(config.app_id.as_deref(), Some("1:1234:web:abcd"));
        assert_eq!(config.database_id, DEFAULT_DATABASE_ID);
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        let missing_key = FirebaseConfig::from_json(r#"{"projectId": "p"}"#);
        assert!(matches!(missing_key, Err(FirebaseError::Serialization(_))));

        let not_json = FirebaseConfig::from_json("apiKey = k");
        assert!(matches!(not_json, Err(FirebaseError::Serialization(_))));
    }
}
