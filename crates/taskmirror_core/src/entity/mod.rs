//! Entity types and the document mapping trait.

mod task;
mod user;

pub use task::{Assignment, Task, UNASSIGNED_NAME};
pub use user::User;

use crate::error::{SyncError, SyncResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use taskmirror_store::{Document, EntityId};

/// Trait for types stored as documents in a [`taskmirror_store::DocumentStore`].
///
/// Implementors map themselves to and from schemaless JSON documents.
/// The entity id lives outside the field map (documents are keyed by it)
/// and is written back into the entity after the store assigns it.
pub trait Entity: Serialize + DeserializeOwned {
    /// Name of the collection this entity lives in.
    const COLLECTION: &'static str;

    /// Returns the entity's identifier (nil until first save).
    fn entity_id(&self) -> EntityId;

    /// Sets the entity's identifier.
    ///
    /// Called when decoding from a stored document and when the store
    /// assigns an id on first save.
    fn set_entity_id(&mut self, id: EntityId);

    /// Encodes the entity into a document.
    fn to_document(&self) -> SyncResult<Document> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => Ok(Document::with_id(self.entity_id(), fields)),
            Ok(_) => Err(SyncError::validation("entity did not encode to an object")),
            Err(e) => Err(SyncError::validation(format!("entity encode failed: {e}"))),
        }
    }

    /// Decodes an entity from a stored document.
    fn from_document(doc: &Document) -> SyncResult<Self> {
        let value = Value::Object(doc.fields().clone());
        let mut entity: Self = serde_json::from_value(value)
            .map_err(|e| SyncError::validation(format!("entity decode failed: {e}")))?;
        entity.set_entity_id(doc.id());
        Ok(entity)
    }
}
