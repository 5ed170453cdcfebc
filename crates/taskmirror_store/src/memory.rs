//! In-memory document store.

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::id::EntityId;
use crate::query::{compare_values, Filter, ListQuery, Order};
use crate::store::DocumentStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A thread-safe in-memory document store.
///
/// Collections are created implicitly on first write. Documents within a
/// collection keep insertion order, which is also the order `find`
/// returns them in when no sort is requested.
///
/// Suitable for:
/// - Unit and integration tests
/// - Ephemeral deployments that don't need persistence
///
/// # Example
///
/// ```rust
/// use taskmirror_store::{Document, DocumentStore, MemoryStore};
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// let mut doc = Document::new();
/// doc.set("name", json!("alice"));
/// let saved = store.save("users", doc).unwrap();
/// assert!(store.find_by_id("users", saved.id()).unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every document from every collection.
    pub fn clear(&self) {
        self.collections.write().clear();
    }

    /// Returns the ids in a collection, in insertion order.
    ///
    /// Useful for test assertions.
    #[must_use]
    pub fn ids(&self, collection: &str) -> Vec<EntityId> {
        self.collections
            .read()
            .get(collection)
            .map(|docs| docs.iter().map(Document::id).collect())
            .unwrap_or_default()
    }
}

impl DocumentStore for MemoryStore {
    fn find_by_id(&self, collection: &str, id: EntityId) -> StoreResult<Option<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id() == id))
            .cloned())
    }

    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    fn find(&self, collection: &str, query: &ListQuery) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read();
        let mut matched: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| query.filter.matches(d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(collections);

        // Later sort keys are applied first so earlier keys dominate;
        // the sort is stable, preserving insertion order among ties.
        for key in query.sort.iter().rev() {
            matched.sort_by(|a, b| {
                let ordering = compare_values(a.get(&key.field), b.get(&key.field));
                match key.order {
                    Order::Asc => ordering,
                    Order::Desc => ordering.reverse(),
                }
            });
        }

        let skip = query.skip.unwrap_or(0);
        let mut page: Vec<Document> = match query.limit {
            Some(limit) => matched.into_iter().skip(skip).take(limit).collect(),
            None => matched.into_iter().skip(skip).collect(),
        };

        if let Some(projection) = &query.select {
            page = page.iter().map(|d| projection.apply(d)).collect();
        }

        Ok(page)
    }

    fn save(&self, collection: &str, mut doc: Document) -> StoreResult<Document> {
        if doc.id().is_nil() {
            doc.set_id(EntityId::new());
        }

        let mut collections = self.collections.write();
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id() == doc.id()) {
            Some(existing) => *existing = doc.clone(),
            None => docs.push(doc.clone()),
        }
        Ok(doc)
    }

    fn delete(&self, collection: &str, id: EntityId) -> StoreResult<()> {
        let mut collections = self.collections.write();
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let before = docs.len();
        docs.retain(|d| d.id() != id);
        if docs.len() == before {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }
}
