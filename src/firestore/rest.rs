//! Firestore REST backend
//!
//! Reads use `GET documents/{path}`; merge writes use a single-write
//! `documents:commit` with an update mask of leaf field paths and a
//! `REQUEST_TIME` transform for the timestamp field.

use crate::auth::session::SessionState;
use crate::config::FirebaseConfig;
use crate::error::FirestoreError;
use crate::firestore::backend::DocumentBackend;
use crate::firestore::document_reference::DocumentReference;
use crate::firestore::value::{decode_fields, encode_fields, field_paths, quote_segment, DocumentData};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

/// Document store backed by the Firestore REST API
#[derive(Clone)]
pub struct RestDocumentStore {
    http_client: reqwest::Client,
    base_url: String,
    database_path: String,
    session: SessionState,
}

/// Document resource as returned by `GET documents/{path}`
#[derive(Debug, Deserialize)]
struct RestDocument {
    #[serde(default)]
    fields: Map<String, Value>,
}

impl RestDocumentStore {
    /// Create a store for the database in `config`
    ///
    /// Requests carry the ID token of the session in `session`, if any.
    pub fn new(config: &FirebaseConfig, http_client: reqwest::Client, session: SessionState) -> Self {
        Self {
            http_client,
            base_url: config.settings.firestore_base_url(),
            database_path: config.database_path(),
            session,
        }
    }

    /// Full resource name of a document
    pub(crate) fn document_name(&self, doc: &DocumentReference) -> String {
        doc.full_path(&self.database_path)
    }

    fn url_for(&self, resource: &str) -> Result<Url, FirestoreError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FirestoreError::InvalidArgument(format!("invalid Firestore host: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FirestoreError::InvalidArgument("Firestore host cannot be a base URL".to_string()))?
            .extend(resource.split('/'));
        Ok(url)
    }

    pub(crate) fn document_url(&self, doc: &DocumentReference) -> Result<Url, FirestoreError> {
        self.url_for(&self.document_name(doc))
    }

    pub(crate) fn commit_url(&self) -> Result<Url, FirestoreError> {
        self.url_for(&format!("{}/documents:commit", self.database_path))
    }

    /// Body of the commit request for one merge write
    pub(crate) fn commit_body(
        &self,
        doc: &DocumentReference,
        mut data: DocumentData,
        timestamp_field: &str,
    ) -> Value {
        // The transform owns the timestamp field; a field may not be both
        // updated and transformed in one write
        data.remove(timestamp_field);

        json!({
            "writes": [{
                "update": {
                    "name": self.document_name(doc),
                    "fields": encode_fields(&data)
                },
                "updateMask": { "fieldPaths": field_paths(&data) },
                "updateTransforms": [{
                    "fieldPath": quote_segment(timestamp_field),
                    "setToServerValue": "REQUEST_TIME"
                }]
            }]
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let user = self.session.current();
        match user.as_deref().and_then(|u| u.id_token()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn connection_error(e: reqwest::Error) -> FirestoreError {
    FirestoreError::Connection(e.to_string())
}

/// Map an error response to `FirestoreError`
///
/// Prefers the `error.status` name of the body; falls back to the HTTP code.
pub(crate) fn error_from_response(status: StatusCode, body: Option<&Value>) -> FirestoreError {
    let error = body.and_then(|b| b.get("error"));
    let status_name = error.and_then(|e| e.get("status")).and_then(Value::as_str);
    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    if let Some(name) = status_name {
        return FirestoreError::from_status_name(name, message);
    }

    match status {
        StatusCode::BAD_REQUEST => FirestoreError::InvalidArgument(message.to_string()),
        StatusCode::UNAUTHORIZED => FirestoreError::Unauthenticated,
        StatusCode::FORBIDDEN => FirestoreError::PermissionDenied,
        StatusCode::NOT_FOUND => FirestoreError::NotFound,
        StatusCode::CONFLICT => FirestoreError::Aborted,
        StatusCode::TOO_MANY_REQUESTS => FirestoreError::ResourceExhausted,
        StatusCode::SERVICE_UNAVAILABLE => FirestoreError::Unavailable,
        StatusCode::GATEWAY_TIMEOUT => FirestoreError::DeadlineExceeded,
        other => FirestoreError::Unknown(format!("HTTP {}", other)),
    }
}

/// Whether a 404 body reports the document itself as missing
///
/// Firestore answers `Document "<name>" not found.` for an absent document
/// and also uses `NOT_FOUND` for a missing database or project.
pub(crate) fn is_missing_document(body: Option<&Value>, name: &str) -> bool {
    let message = body
        .and_then(|b| b.get("error"))
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str);
    match message {
        None => true,
        Some(message) => message.contains(name),
    }
}

async fn read_error(response: reqwest::Response) -> FirestoreError {
    let status = response.status();
    let body = response.json::<Value>().await.ok();
    error_from_response(status, body.as_ref())
}

#[async_trait]
impl DocumentBackend for RestDocumentStore {
    async fn fetch(&self, doc: &DocumentReference) -> Result<Option<DocumentData>, FirestoreError> {
        doc.validate()?;

        let response = self
            .authorize(self.http_client.get(self.document_url(doc)?))
            .send()
            .await
            .map_err(connection_error)?;

        // Missing document is not an error; a missing database is
        if response.status() == StatusCode::NOT_FOUND {
            let body = response.json::<Value>().await.ok();
            let name = self.document_name(doc);
            if is_missing_document(body.as_ref(), &name) {
                return Ok(None);
            }
            debug!(document = %name, body = ?body, "NOT_FOUND does not refer to the document");
            return Err(error_from_response(StatusCode::NOT_FOUND, body.as_ref()));
        }
        if !response.status().is_success() {
            return Err(read_error(response).await);
        }

        let document: RestDocument = response
            .json()
            .await
            .map_err(|e| FirestoreError::InvalidData(format!("invalid document response: {}", e)))?;
        Ok(Some(decode_fields(&document.fields)?))
    }

    async fn merge(
        &self,
        doc: &DocumentReference,
        data: DocumentData,
        timestamp_field: &str,
    ) -> Result<(), FirestoreError> {
        doc.validate()?;

        let body = self.commit_body(doc, data, timestamp_field);
        let response = self
            .authorize(self.http_client.post(self.commit_url()?))
            .json(&body)
            .send()
            .await
            .map_err(connection_error)?;

        if !response.status().is_success() {
            return Err(read_error(response).await);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RestDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestDocumentStore")
            .field("base_url", &self.base_url)
            .field("database_path", &self.database_path)
            .finish()
    }
}
