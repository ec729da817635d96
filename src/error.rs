//! Firebase Bridge error types
//!
//! Backend errors (`FirestoreError`, `AuthError`) describe what the platform
//! reported. The data facade annotates them with the affected document
//! (`FetchError`, `WriteError`) without altering the cause. The auth facade
//! returns `AuthError` as-is.
//!
//! # Design
//! Uses thiserror for ergonomic error definitions. All errors implement
//! std::error::Error and can be converted to FirebaseError via From trait.

use thiserror::Error;

/// Top-level Firebase error type
///
/// Wraps the module-specific errors into a unified type.
///
/// # Example
/// ```
/// use firebase_bridge::{FirebaseError, AuthError};
///
/// let auth_err: FirebaseError = AuthError::InvalidEmail.into();
/// ```
#[derive(Debug, Error)]
pub enum FirebaseError {
    /// Authentication-related errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Firestore-related errors
    #[error("Firestore error: {0}")]
    Firestore(#[from] FirestoreError),

    /// Document read failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Document write failed
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Network/HTTP errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed JSON input, e.g. in `FirebaseConfig::from_json`
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// API key not configured
    #[error("API key not configured")]
    ApiKeyNotConfigured,
}

/// Failure of `Database::get`, carrying the backend error untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to read {collection}/{document}: {source}")]
pub struct FetchError {
    /// Collection of the document being read
    pub collection: String,
    /// ID of the document being read
    pub document: String,
    /// Error reported by the document backend
    #[source]
    pub source: FirestoreError,
}

/// Failure of `Database::set`, carrying the backend error untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("failed to write {collection}/{document}: {source}")]
pub struct WriteError {
    /// Collection of the document being written
    pub collection: String,
    /// ID of the document being written
    pub document: String,
    /// Error reported by the document backend
    #[source]
    pub source: FirestoreError,
}

/// Authentication errors
///
/// Maps Identity Toolkit error codes to Rust enum variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email address is invalid
    #[error("Invalid email address")]
    InvalidEmail,

    /// Password is invalid
    #[error("Invalid password")]
    InvalidPassword,

    /// Email already in use by another account
    #[error("Email already in use")]
    EmailAlreadyInUse,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Wrong password
    #[error("Wrong password")]
    WrongPassword,

    /// User account has been disabled
    #[error("User account disabled")]
    UserDisabled,

    /// Too many failed login attempts
    #[error("Too many requests, try again later")]
    TooManyRequests,

    /// Operation not allowed (e.g., provider disabled)
    #[error("Operation not allowed")]
    OperationNotAllowed,

    /// Invalid credential
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// User token has expired
    #[error("User token expired")]
    UserTokenExpired,

    /// Invalid user token
    #[error("Invalid user token")]
    InvalidUserToken,

    /// Network error
    #[error("Network error: {0}")]
    NetworkRequestFailed(String),

    /// Requires recent login
    #[error("This operation requires recent authentication")]
    RequiresRecentLogin,

    /// Invalid API key
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Unknown error with the code reported by the service
    #[error("Unknown auth error: {0}")]
    Unknown(String),
}

/// Firestore errors
///
/// Maps Firestore status names to Rust enum variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FirestoreError {
    /// Document not found
    #[error("Document not found")]
    NotFound,

    /// Permission denied
    #[error("Permission denied")]
    PermissionDenied,

    /// Resource already exists
    #[error("Resource already exists")]
    AlreadyExists,

    /// Resource exhausted (e.g., quota exceeded)
    #[error("Resource exhausted")]
    ResourceExhausted,

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Deadline exceeded
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// Operation was aborted
    #[error("Operation aborted")]
    Aborted,

    /// Failed precondition
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// Unimplemented feature
    #[error("Feature not implemented")]
    Unimplemented,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Service unavailable
    #[error("Service unavailable")]
    Unavailable,

    /// Unauthenticated
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Connection or network error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Unknown error with the status reported by the service
    #[error("Unknown Firestore error: {0}")]
    Unknown(String),
}

impl FirebaseError {
    /// Create an internal error from a string
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_)
            | Self::Auth(AuthError::NetworkRequestFailed(_))
            | Self::Auth(AuthError::TooManyRequests) => true,
            Self::Firestore(e) => e.is_retryable(),
            Self::Fetch(e) => e.source.is_retryable(),
            Self::Write(e) => e.source.is_retryable(),
            _ => false,
        }
    }

    /// Check if error indicates authentication is required
    pub fn requires_auth(&self) -> bool {
        match self {
            Self::Auth(AuthError::RequiresRecentLogin)
            | Self::Auth(AuthError::UserTokenExpired)
            | Self::Auth(AuthError::InvalidUserToken)
            | Self::Firestore(FirestoreError::Unauthenticated) => true,
            Self::Fetch(e) => e.source == FirestoreError::Unauthenticated,
            Self::Write(e) => e.source == FirestoreError::Unauthenticated,
            _ => false,
        }
    }
}

impl AuthError {
    /// Create from Identity Toolkit REST API error message
    ///
    /// Messages may carry a detail suffix (`"WEAK_PASSWORD : Password should be
    /// at least 6 characters"`); only the code before `" : "` is matched.
    pub fn from_error_code(message: &str) -> Self {
        let code = message.split(" : ").next().unwrap_or(message).trim();
        match code {
            "EMAIL_NOT_FOUND" => Self::UserNotFound,
            "INVALID_PASSWORD" => Self::WrongPassword,
            "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredential(code.to_string()),
            "USER_DISABLED" => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyRequests,
            "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "OPERATION_NOT_ALLOWED" | "PASSWORD_LOGIN_DISABLED" => Self::OperationNotAllowed,
            "INVALID_EMAIL" | "MISSING_EMAIL" => Self::InvalidEmail,
            "WEAK_PASSWORD" | "MISSING_PASSWORD" => Self::InvalidPassword,
            "INVALID_ID_TOKEN" => Self::InvalidUserToken,
            "TOKEN_EXPIRED" => Self::UserTokenExpired,
            "INVALID_API_KEY" | "API_KEY_INVALID" => Self::InvalidApiKey,
            "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => Self::RequiresRecentLogin,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl FirestoreError {
    /// Create from a Firestore REST error status name (`"PERMISSION_DENIED"`)
    pub fn from_status_name(status: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            "ABORTED" => Self::Aborted,
            "INVALID_ARGUMENT" => Self::InvalidArgument(message),
            "DEADLINE_EXCEEDED" => Self::DeadlineExceeded,
            "NOT_FOUND" => Self::NotFound,
            "ALREADY_EXISTS" => Self::AlreadyExists,
            "PERMISSION_DENIED" => Self::PermissionDenied,
            "RESOURCE_EXHAUSTED" => Self::ResourceExhausted,
            "FAILED_PRECONDITION" => Self::FailedPrecondition(message),
            "UNIMPLEMENTED" => Self::Unimplemented,
            "INTERNAL" => Self::Internal(message),
            "UNAVAILABLE" => Self::Unavailable,
            "UNAUTHENTICATED" => Self::Unauthenticated,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Check if the platform reported a transient condition
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable | Self::DeadlineExceeded | Self::ResourceExhausted | Self::Connection(_)
        )
    }
}
