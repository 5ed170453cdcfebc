//! Typed collection access over the document store.

use crate::entity::Entity;
use crate::error::SyncResult;
use std::marker::PhantomData;
use std::sync::Arc;
use taskmirror_store::{Document, DocumentStore, EntityId, Filter, ListQuery};

/// Type-safe access to one entity type's collection.
///
/// `Collection<T>` wraps the schemaless [`DocumentStore`] capability and
/// handles encoding/decoding through the [`Entity`] trait. Each method is
/// a single store call; there is no transaction spanning calls.
pub struct Collection<T: Entity> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<T>,
}

impl<T: Entity> Collection<T> {
    /// Creates a typed collection over a store handle.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        T::COLLECTION
    }

    /// Gets an entity by id.
    ///
    /// Returns `None` if the entity doesn't exist.
    pub fn get(&self, id: EntityId) -> SyncResult<Option<T>> {
        match self.store.find_by_id(T::COLLECTION, id)? {
            Some(doc) => Ok(Some(T::from_document(&doc)?)),
            None => Ok(None),
        }
    }

    /// Returns the first entity matching the filter, in insertion order.
    pub fn find_one(&self, filter: &Filter) -> SyncResult<Option<T>> {
        match self.store.find_one(T::COLLECTION, filter)? {
            Some(doc) => Ok(Some(T::from_document(&doc)?)),
            None => Ok(None),
        }
    }

    /// Returns all entities matching the filter, in insertion order.
    pub fn find(&self, filter: &Filter) -> SyncResult<Vec<T>> {
        let query = ListQuery::new().filter(filter.clone());
        let docs = self.store.find(T::COLLECTION, &query)?;
        docs.iter().map(|doc| T::from_document(doc)).collect()
    }

    /// Returns raw documents for a full listing query.
    ///
    /// Listing with projection can drop required fields, so the result
    /// stays untyped; response shaping is the caller's concern.
    pub fn list(&self, query: &ListQuery) -> SyncResult<Vec<Document>> {
        Ok(self.store.find(T::COLLECTION, query)?)
    }

    /// Saves the entity, writing the store-assigned id back on insert.
    pub fn save(&self, entity: &mut T) -> SyncResult<()> {
        let doc = entity.to_document()?;
        let saved = self.store.save(T::COLLECTION, doc)?;
        entity.set_entity_id(saved.id());
        Ok(())
    }

    /// Deletes an entity by id.
    pub fn delete(&self, id: EntityId) -> SyncResult<()> {
        self.store.delete(T::COLLECTION, id)?;
        Ok(())
    }

    /// Counts entities matching the filter.
    pub fn count(&self, filter: &Filter) -> SyncResult<u64> {
        Ok(self.store.count(T::COLLECTION, filter)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::User;
    use serde_json::json;
    use taskmirror_store::MemoryStore;

    fn users() -> Collection<User> {
        Collection::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn name_comes_from_the_entity_type() {
        use crate::entity::Task;
        assert_eq!(users().name(), "users");
        assert_eq!(
            Collection::<Task>::new(Arc::new(MemoryStore::new())).name(),
            "tasks"
        );
    }

    #[test]
    fn save_assigns_id_back_to_entity() {
        let collection = users();
        let mut user = User::new("alice", "alice@example.com");
        assert!(user.id().is_nil());

        collection.save(&mut user).unwrap();
        assert!(!user.id().is_nil());
    }

    #[test]
    fn get_roundtrips_entity() {
        let collection = users();
        let mut user = User::new("alice", "alice@example.com");
        collection.save(&mut user).unwrap();

        let found = collection.get(user.id()).unwrap();
        assert_eq!(found, Some(user));
    }

    #[test]
    fn get_nonexistent_is_none() {
        let collection = users();
        assert!(collection.get(EntityId::new()).unwrap().is_none());
    }

    #[test]
    fn save_replaces_existing() {
        let collection = users();
        let mut user = User::new("alice", "alice@example.com");
        collection.save(&mut user).unwrap();

        user.name = "alicia".to_string();
        collection.save(&mut user).unwrap();

        let found = collection.get(user.id()).unwrap().unwrap();
        assert_eq!(found.name, "alicia");
        assert_eq!(collection.count(&Filter::new()).unwrap(), 1);
    }

    #[test]
    fn find_one_by_case_insensitive_email() {
        let collection = users();
        let mut user = User::new("alice", "Alice@Example.com");
        collection.save(&mut user).unwrap();

        let found = collection
            .find_one(&Filter::new().eq_ignore_case("email", "alice@example.COM"))
            .unwrap();
        assert_eq!(found.map(|u| u.id()), Some(user.id()));
    }

    #[test]
    fn find_filters_typed_entities() {
        let collection = users();
        for name in ["a", "b"] {
            let mut user = User::new(name, format!("{name}@example.com"));
            collection.save(&mut user).unwrap();
        }

        let found = collection
            .find(&Filter::new().eq("name", json!("a")))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "a");
    }

    #[test]
    fn delete_removes_entity() {
        let collection = users();
        let mut user = User::new("alice", "alice@example.com");
        collection.save(&mut user).unwrap();

        collection.delete(user.id()).unwrap();
        assert!(collection.get(user.id()).unwrap().is_none());
    }
}
