//! The document-store capability trait.

use crate::document::Document;
use crate::error::StoreResult;
use crate::id::EntityId;
use crate::query::{Filter, ListQuery};

/// The storage capability the sync engine is written against.
///
/// Every method is a single, independent store operation. There is no
/// transaction spanning calls: a multi-step engine operation that fails
/// partway leaves its earlier writes committed.
///
/// Implementations must be safe to share across threads.
pub trait DocumentStore: Send + Sync {
    /// Looks up a document by id.
    ///
    /// Returns `None` if no document with that id exists in the
    /// collection.
    fn find_by_id(&self, collection: &str, id: EntityId) -> StoreResult<Option<Document>>;

    /// Returns the first document matching the filter, in insertion
    /// order, or `None`.
    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Returns all documents matching the query, after sorting,
    /// projection, and pagination.
    fn find(&self, collection: &str, query: &ListQuery) -> StoreResult<Vec<Document>>;

    /// Saves a document, inserting or replacing by id.
    ///
    /// A document carrying the nil id is assigned a fresh id; the saved
    /// document (with its id) is returned.
    fn save(&self, collection: &str, doc: Document) -> StoreResult<Document>;

    /// Deletes a document by id.
    ///
    /// Fails with [`crate::StoreError::DocumentNotFound`] if absent.
    fn delete(&self, collection: &str, id: EntityId) -> StoreResult<()>;

    /// Counts documents matching the filter.
    fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;
}
