//! Fault injection for partial-failure tests.
//!
//! The engine performs multi-write operations without transactions, so
//! a store failure partway through leaves earlier writes committed.
//! [`FailingStore`] wraps a real store and starts rejecting writes after
//! a configured budget, letting tests observe exactly that state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use taskmirror_store::{
    Document, DocumentStore, EntityId, Filter, ListQuery, StoreError, StoreResult,
};

/// A store wrapper that fails writes after a configurable budget.
///
/// Reads always pass through. Writes (save and delete) count against
/// the budget; once it is exhausted every further write fails with a
/// backend error. The budget is `usize::MAX` until armed.
pub struct FailingStore {
    inner: Arc<dyn DocumentStore>,
    writes_allowed: AtomicUsize,
    writes_performed: AtomicUsize,
}

impl FailingStore {
    /// Wraps an inner store with an unarmed failpoint.
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner,
            writes_allowed: AtomicUsize::new(usize::MAX),
            writes_performed: AtomicUsize::new(0),
        }
    }

    /// Arms the failpoint: the next `budget` writes succeed, every
    /// write after that fails.
    pub fn fail_after_writes(&self, budget: usize) {
        self.writes_allowed.store(budget, Ordering::SeqCst);
        self.writes_performed.store(0, Ordering::SeqCst);
    }

    /// Disarms the failpoint; writes succeed again.
    pub fn disarm(&self) {
        self.writes_allowed.store(usize::MAX, Ordering::SeqCst);
    }

    /// Returns how many writes have been attempted since the last
    /// arming, failed ones included.
    pub fn writes_performed(&self) -> usize {
        self.writes_performed.load(Ordering::SeqCst)
    }

    fn charge_write(&self) -> StoreResult<()> {
        let allowed = self.writes_allowed.load(Ordering::SeqCst);
        let performed = self.writes_performed.fetch_add(1, Ordering::SeqCst);
        if performed >= allowed {
            return Err(StoreError::backend("injected write failure"));
        }
        Ok(())
    }
}

impl DocumentStore for FailingStore {
    fn find_by_id(&self, collection: &str, id: EntityId) -> StoreResult<Option<Document>> {
        self.inner.find_by_id(collection, id)
    }

    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        self.inner.find_one(collection, filter)
    }

    fn find(&self, collection: &str, query: &ListQuery) -> StoreResult<Vec<Document>> {
        self.inner.find(collection, query)
    }

    fn save(&self, collection: &str, doc: Document) -> StoreResult<Document> {
        self.charge_write()?;
        self.inner.save(collection, doc)
    }

    fn delete(&self, collection: &str, id: EntityId) -> StoreResult<()> {
        self.charge_write()?;
        self.inner.delete(collection, id)
    }

    fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.inner.count(collection, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmirror_store::MemoryStore;

    fn failing() -> (FailingStore, Arc<MemoryStore>) {
        let inner = Arc::new(MemoryStore::new());
        (
            FailingStore::new(inner.clone() as Arc<dyn DocumentStore>),
            inner,
        )
    }

    #[test]
    fn unarmed_store_passes_writes_through() {
        let (store, inner) = failing();
        store.save("things", Document::new()).unwrap();
        assert_eq!(inner.count("things", &Filter::new()).unwrap(), 1);
    }

    #[test]
    fn armed_store_fails_after_budget() {
        let (store, inner) = failing();
        store.fail_after_writes(2);

        store.save("things", Document::new()).unwrap();
        store.save("things", Document::new()).unwrap();
        let err = store.save("things", Document::new()).unwrap_err();
        assert!(matches!(err, StoreError::Backend { .. }));

        // Earlier writes stay committed
        assert_eq!(inner.count("things", &Filter::new()).unwrap(), 2);
        assert_eq!(store.writes_performed(), 3);
    }

    #[test]
    fn disarm_restores_writes() {
        let (store, _inner) = failing();
        store.fail_after_writes(0);
        assert!(store.save("things", Document::new()).is_err());

        store.disarm();
        store.save("things", Document::new()).unwrap();
    }

    #[test]
    fn reads_ignore_the_budget() {
        let (store, _inner) = failing();
        let doc = store.save("things", Document::new()).unwrap();
        store.fail_after_writes(0);

        assert!(store.find_by_id("things", doc.id()).unwrap().is_some());
        assert_eq!(store.count("things", &Filter::new()).unwrap(), 1);
    }
}
