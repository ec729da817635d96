//! Document store backend seam
//!
//! `Database` forwards every call to a `DocumentBackend`. The REST backend
//! talks to the hosted service; the in-memory backend reproduces its
//! observable semantics locally.

use crate::error::FirestoreError;
use crate::firestore::document_reference::DocumentReference;
use crate::firestore::value::DocumentData;
use async_trait::async_trait;

/// Operations the data facade needs from a hosted document store
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Read one document
    ///
    /// Returns `Ok(None)` when the document does not exist.
    async fn fetch(&self, doc: &DocumentReference) -> Result<Option<DocumentData>, FirestoreError>;

    /// Merge `data` into the document, creating it if needed
    ///
    /// Fields not present in `data` are preserved and nested objects are
    /// merged recursively. `timestamp_field` is set to a timestamp assigned
    /// by the store, strictly later than any it assigned before.
    async fn merge(
        &self,
        doc: &DocumentReference,
        data: DocumentData,
        timestamp_field: &str,
    ) -> Result<(), FirestoreError>;
}
