//! Remote document store port.
//!
//! The managed document database is the source of truth for RSVPs, chat,
//! user profiles and admin-created events. This trait is the single
//! authoritative interface to it; adapters decide the wire format.
//!
//! # Example
//!
//! ```no_run
//! use eventide_core::DocumentStore;
//! use eventide_domain::{DocumentPath, Result};
//!
//! async fn has_rsvp(store: &dyn DocumentStore, event_id: &str, uid: &str) -> Result<bool> {
//!     let path = DocumentPath::new(["events", event_id, "attendees", uid])?;
//!     Ok(store.get(&path).await?.is_some())
//! }
//! ```

use async_trait::async_trait;
use eventide_domain::{Document, DocumentPath, Fields, OrderBy, Result};

/// Port for per-collection create/read/update/delete.
///
/// Writes may contain `FieldValue::ServerTimestamp`; the store resolves it
/// against its own clock. Reads never return the sentinel.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document. `None` if it does not exist.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>>;

    /// Create or overwrite a document.
    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<()>;

    /// Merge `fields` into a document, creating it if missing.
    async fn update(&self, path: &DocumentPath, fields: Fields) -> Result<()>;

    /// Delete a document. Deleting an absent document is not an error.
    async fn delete(&self, path: &DocumentPath) -> Result<()>;

    /// Create a document with a store-assigned id under `collection`.
    /// Returns the new id.
    async fn add(&self, collection: &DocumentPath, fields: Fields) -> Result<String>;

    /// List every document in `collection`, optionally ordered by one field.
    async fn list(&self, collection: &DocumentPath, order: Option<OrderBy>)
        -> Result<Vec<Document>>;
}
