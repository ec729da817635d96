//! Data-access facade
//!
//! `get` / `set` over a document store plus the readiness flag. Every call
//! goes straight to the `DocumentBackend`; failures are logged and returned
//! with the backend error as their source.

use crate::error::{FetchError, WriteError};
use crate::firestore::backend::DocumentBackend;
use crate::firestore::document_reference::DocumentReference;
use crate::firestore::value::DocumentData;
use crate::readiness::Readiness;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Field set to the server time on every `set`
pub const LAST_UPDATED_FIELD: &str = "ultimaActualizacion";

/// Document read/write service
///
/// Cheap to clone; clones share the backend and the readiness flag.
#[derive(Clone)]
pub struct Database {
    backend: Arc<dyn DocumentBackend>,
    readiness: Readiness,
}

impl Database {
    pub(crate) fn new(backend: Arc<dyn DocumentBackend>, readiness: Readiness) -> Self {
        Self { backend, readiness }
    }

    /// The underlying document store handle
    pub fn backend(&self) -> &Arc<dyn DocumentBackend> {
        &self.backend
    }

    /// Whether the readiness delay has elapsed
    ///
    /// Reads and writes are never gated on this.
    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    /// Resolve once `is_ready()` would return true
    pub async fn wait_until_ready(&self) {
        self.readiness.wait().await
    }

    /// Fetch one document
    ///
    /// A missing document is `Ok(None)`, not an error.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example(db: firebase_bridge::Database) -> Result<(), Box<dyn std::error::Error>> {
    /// match db.get("usuarios", "ana").await? {
    ///     Some(data) => println!("nombre = {}", data["nombre"]),
    ///     None => println!("no such user"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, collection: &str, document_id: &str) -> Result<Option<DocumentData>, FetchError> {
        let doc = DocumentReference::new(collection, document_id);
        match self.backend.fetch(&doc).await {
            Err(source) => {
                error!(collection, document = document_id, error = %source, "failed to read document");
                Err(FetchError {
                    collection: collection.to_string(),
                    document: document_id.to_string(),
                    source,
                })
            }
            Ok(None) => {
                info!(collection, document = document_id, "document does not exist");
                Ok(None)
            }
            Ok(Some(data)) => {
                debug!(collection, document = document_id, fields = data.len(), "document read");
                Ok(Some(data))
            }
        }
    }

    /// Merge `data` into a document and stamp `ultimaActualizacion`
    ///
    /// Fields absent from `data` keep their stored values. Returns
    /// `Ok(true)` once the store accepted the write.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example(db: firebase_bridge::Database) -> Result<(), Box<dyn std::error::Error>> {
    /// let data = serde_json::json!({ "nombre": "Ana" });
    /// let serde_json::Value::Object(fields) = data else { unreachable!() };
    /// db.set("usuarios", "ana", fields).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set(
        &self,
        collection: &str,
        document_id: &str,
        data: DocumentData,
    ) -> Result<bool, WriteError> {
        let doc = DocumentReference::new(collection, document_id);
        let fields = data.len();
        if let Err(source) = self.backend.merge(&doc, data, LAST_UPDATED_FIELD).await {
            error!(collection, document = document_id, error = %source, "failed to write document");
            return Err(WriteError {
                collection: collection.to_string(),
                document: document_id.to_string(),
                source,
            });
        }
        info!(collection, document = document_id, fields, "document saved");
        Ok(true)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("ready", &self.is_ready())
            .finish()
    }
}
