//! In-memory document store
//!
//! Same observable behavior as the hosted store for the operations the data
//! facade uses: merge writes, server-assigned timestamps, `None` for missing
//! documents. An offline switch makes every call fail like a dropped
//! connection.

use crate::error::FirestoreError;
use crate::firestore::backend::DocumentBackend;
use crate::firestore::document_reference::DocumentReference;
use crate::firestore::timestamp::Timestamp;
use crate::firestore::value::DocumentData;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Document store held in process memory
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    state: RwLock<StoreState>,
    offline: AtomicBool,
}

#[derive(Debug, Default)]
struct StoreState {
    documents: HashMap<String, DocumentData>,
    last_timestamp: Option<Timestamp>,
}

impl MemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing (or regaining) the connection to the store
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }

    /// Whether the store holds no documents
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.documents.is_empty()
    }

    fn check_online(&self) -> Result<(), FirestoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(FirestoreError::Connection(
                "document store is unreachable".to_string(),
            ));
        }
        Ok(())
    }
}

impl StoreState {
    /// Current time, bumped past the last assigned timestamp if the clock
    /// has not advanced
    fn next_timestamp(&mut self) -> Timestamp {
        let now = Timestamp::now();
        let assigned = match self.last_timestamp {
            Some(last) if now <= last => last.next_after(),
            _ => now,
        };
        self.last_timestamp = Some(assigned);
        assigned
    }
}

#[async_trait]
impl DocumentBackend for MemoryDocumentStore {
    async fn fetch(&self, doc: &DocumentReference) -> Result<Option<DocumentData>, FirestoreError> {
        self.check_online()?;
        doc.validate()?;

        let state = self.state.read().await;
        Ok(state.documents.get(&doc.path()).cloned())
    }

    async fn merge(
        &self,
        doc: &DocumentReference,
        data: DocumentData,
        timestamp_field: &str,
    ) -> Result<(), FirestoreError> {
        self.check_online()?;
        doc.validate()?;

        let mut state = self.state.write().await;
        let stamp = state.next_timestamp().to_rfc3339()?;

        let existing = state.documents.entry(doc.path()).or_default();
        merge_fields(existing, data);
        existing.insert(timestamp_field.to_string(), Value::String(stamp));
        Ok(())
    }
}

/// Merge `incoming` into `target` the way a masked update does
///
/// Non-empty objects merge into existing objects; every other value,
/// including an empty object, replaces what was there.
pub(crate) fn merge_fields(target: &mut DocumentData, incoming: DocumentData) {
    for (key, value) in incoming {
        match value {
            Value::Object(inner) if !inner.is_empty() => {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    merge_fields(existing, inner);
                } else {
                    target.insert(key, Value::Object(inner));
                }
            }
            value => {
                target.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> DocumentData {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_fetch_missing_returns_none() {
        let store = MemoryDocumentStore::new();
        let doc = DocumentReference::new("usuarios", "nadie");
        assert_eq!(store.fetch(&doc).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_merge_creates_and_stamps() {
        let store = MemoryDocumentStore::new();
        let doc = DocumentReference::new("usuarios", "ana");

        store.merge(&doc, object(json!({ "nombre": "Ana" })), "ts").await.unwrap();

        let data = store.fetch(&doc).await.unwrap().unwrap();
        assert_eq!(data["nombre"], json!("Ana"));
        let stamp = data["ts"].as_str().unwrap();
        assert!(Timestamp::parse_rfc3339(stamp).is_ok());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_timestamps_strictly_increase() {
        let store = MemoryDocumentStore::new();
        let doc = DocumentReference::new("contadores", "c");

        let mut previous = None;
        for _ in 0..50 {
            store.merge(&doc, object(json!({ "x": 1 })), "ts").await.unwrap();
            let data = store.fetch(&doc).await.unwrap().unwrap();
            let ts = Timestamp::parse_rfc3339(data["ts"].as_str().unwrap()).unwrap();
            if let Some(prev) = previous {
                assert!(ts > prev);
            }
            previous = Some(ts);
        }
    }

    #[test]
    fn test_merge_fields_recurses_into_objects() {
        let mut target = object(json!({ "perfil": { "edad": 30, "ciudad": "Lima" }, "a": 1 }));
        merge_fields(&mut target, object(json!({ "perfil": { "edad": 31 }, "b": 2 })));
        assert_eq!(
            Value::Object(target),
            json!({ "perfil": { "edad": 31, "ciudad": "Lima" }, "a": 1, "b": 2 })
        );
    }

    #[test]
    fn test_merge_fields_replaces_non_objects_and_empty_objects() {
        let mut target = object(json!({ "perfil": { "edad": 30 }, "tags": [1, 2] }));
        merge_fields(&mut target, object(json!({ "perfil": {}, "tags": [3] })));
        assert_eq!(Value::Object(target), json!({ "perfil": {}, "tags": [3] }));
    }

    #[tokio::test]
    async fn test_offline_fails_with_connection_error() {
        let store = MemoryDocumentStore::new();
        store.set_offline(true);
        let doc = DocumentReference::new("usuarios", "ana");

        let err = store.fetch(&doc).await.unwrap_err();
        assert!(matches!(err, FirestoreError::Connection(_)));

        let err = store.merge(&doc, DocumentData::new(), "ts").await.unwrap_err();
        assert!(matches!(err, FirestoreError::Connection(_)));

        store.set_offline(false);
        assert!(store.fetch(&doc).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_reference_rejected() {
        let store = MemoryDocumentStore::new();
        let doc = DocumentReference::new("usuarios", "a/b");
        let err = store.merge(&doc, DocumentData::new(), "ts").await.unwrap_err();
        assert!(matches!(err, FirestoreError::InvalidArgument(_)));
    }
}
