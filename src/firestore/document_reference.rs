//! Firestore DocumentReference type

use crate::error::FirestoreError;
use std::fmt;

/// Address of one document: `(collection, document_id)`
///
/// The collection may itself be a nested path (`"usuarios/ana/pedidos"`);
/// the document ID is a single segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentReference {
    collection: String,
    document_id: String,
}

impl DocumentReference {
    /// Create a reference without validating it
    pub fn new(collection: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            document_id: document_id.into(),
        }
    }

    /// Collection path
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Get the document ID (last segment of path)
    pub fn id(&self) -> &str {
        &self.document_id
    }

    /// Relative document path (e.g., "users/alice")
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.document_id)
    }

    /// Get the full document name with database prefix
    /// Format: projects/{project_id}/databases/{database_id}/documents/{document_path}
    pub fn full_path(&self, database_path: &str) -> String {
        format!("{}/documents/{}", database_path, self.path())
    }

    /// Check the address is well formed
    ///
    /// Backends call this before touching storage and report failures as
    /// `FirestoreError::InvalidArgument`.
    pub fn validate(&self) -> Result<(), FirestoreError> {
        if self.collection.is_empty() {
            return Err(FirestoreError::InvalidArgument(
                "collection name cannot be empty".to_string(),
            ));
        }
        if self.collection.split('/').any(str::is_empty) {
            return Err(FirestoreError::InvalidArgument(format!(
                "collection path {:?} contains an empty segment",
                self.collection
            )));
        }
        // A collection path always has an odd number of segments
        if self.collection.split('/').count() % 2 == 0 {
            return Err(FirestoreError::InvalidArgument(format!(
                "{:?} is a document path, not a collection path",
                self.collection
            )));
        }
        if self.document_id.is_empty() {
            return Err(FirestoreError::InvalidArgument(
                "document ID cannot be empty".to_string(),
            ));
        }
        if self.document_id.contains('/') {
            return Err(FirestoreError::InvalidArgument(format!(
                "document ID {:?} cannot contain '/'",
                self.document_id
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let doc = DocumentReference::new("usuarios", "ana");
        assert_eq!(doc.id(), "ana");
        assert_eq!(doc.collection(), "usuarios");
        assert_eq!(doc.path(), "usuarios/ana");
        assert_eq!(
            doc.full_path("projects/p/databases/(default)"),
            "projects/p/databases/(default)/documents/usuarios/ana"
        );
    }

    #[test]
    fn test_nested_collection_is_valid() {
        let doc = DocumentReference::new("usuarios/ana/pedidos", "p1");
        assert!(doc.validate().is_ok());
        assert_eq!(doc.to_string(), "usuarios/ana/pedidos/p1");
    }

    #[test]
    fn test_validate_rejects_malformed_addresses() {
        let cases = [
            ("", "doc"),
            ("usuarios", ""),
            ("usuarios", "a/b"),
            ("usuarios/ana", "x"),
            ("usuarios//pedidos", "x"),
        ];
        for (collection, id) in cases {
            let result = DocumentReference::new(collection, id).validate();
            assert!(
                matches!(result, Err(FirestoreError::InvalidArgument(_))),
                "{collection:?}/{id:?} should be rejected"
            );
        }
    }
}
