//! Cloud Firestore module
//!
//! - `database.rs`: the `get` / `set` facade
//! - `backend.rs`: the document store seam
//! - `rest.rs`: Firestore REST implementation
//! - `memory.rs`: in-process implementation
//! - `value.rs`: typed-value codec
//! - `timestamp.rs`, `document_reference.rs`: addressing and time

pub mod backend;
pub mod database;
pub mod document_reference;
pub mod memory;
pub mod rest;
pub mod timestamp;
pub mod value;

pub use backend::DocumentBackend;
pub use database::{Database, LAST_UPDATED_FIELD};
pub use document_reference::DocumentReference;
pub use memory::MemoryDocumentStore;
pub use rest::RestDocumentStore;
pub use timestamp::Timestamp;
pub use value::DocumentData;
