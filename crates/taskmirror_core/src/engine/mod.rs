//! The consistency-maintenance engine.
//!
//! Six operations (create/update/delete per entity), each a bounded,
//! fixed-order sequence of independent store reads and writes that
//! brings the Task→User assignment pointer and the User→Task pending
//! mirror back into agreement. Old-state cleanup always precedes
//! new-state application; the first store failure aborts the remaining
//! steps without rolling back earlier writes.

mod effects;
mod tasks;
mod users;

pub use effects::{Outcome, SideEffects};
pub use tasks::TaskDraft;
pub use users::UserDraft;

use crate::collection::Collection;
use crate::entity::{Task, User};
use crate::error::{SyncError, SyncResult};
use std::collections::HashSet;
use std::sync::Arc;
use taskmirror_store::{Document, DocumentStore, EntityId, Filter, ListQuery};

/// The sync engine: typed access to both collections plus the six
/// mirror-maintaining operations.
///
/// Operations are sequential and non-reentrant; the engine holds no
/// locks across store calls. See the crate docs for the consistency
/// model.
pub struct SyncEngine {
    users: Collection<User>,
    tasks: Collection<Task>,
}

impl SyncEngine {
    /// Creates an engine over a shared store handle.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: Collection::new(Arc::clone(&store)),
            tasks: Collection::new(store),
        }
    }

    /// Gets a user by id.
    pub fn user(&self, id: EntityId) -> SyncResult<User> {
        self.users
            .get(id)?
            .ok_or_else(|| SyncError::user_not_found(id))
    }

    /// Gets a task by id.
    pub fn task(&self, id: EntityId) -> SyncResult<Task> {
        self.tasks
            .get(id)?
            .ok_or_else(|| SyncError::task_not_found(id))
    }

    /// Lists user documents for a structured query.
    ///
    /// Raw documents, because projection can drop required fields;
    /// response shaping belongs to the caller.
    pub fn list_users(&self, query: &ListQuery) -> SyncResult<Vec<Document>> {
        self.users.list(query)
    }

    /// Lists task documents for a structured query.
    pub fn list_tasks(&self, query: &ListQuery) -> SyncResult<Vec<Document>> {
        self.tasks.list(query)
    }

    /// Counts users matching a filter.
    pub fn count_users(&self, filter: &Filter) -> SyncResult<u64> {
        self.users.count(filter)
    }

    /// Counts tasks matching a filter.
    pub fn count_tasks(&self, filter: &Filter) -> SyncResult<u64> {
        self.tasks.count(filter)
    }

    /// Removes a task from a user's pending set and persists the user.
    ///
    /// A missing user is tolerated: the previous owner may already have
    /// been deleted, leaving the task's pointer dangling.
    pub(crate) fn release_from_owner(&self, owner: EntityId, task_id: EntityId) -> SyncResult<()> {
        if let Some(mut previous) = self.users.get(owner)? {
            previous.remove_pending(task_id);
            self.users.save(&mut previous)?;
        }
        Ok(())
    }

    /// Resolves an `assignedUser` request value to a user.
    ///
    /// `None` or the empty string means unassigned. A non-empty value
    /// that is not a well-formed id or does not resolve to an existing
    /// user is an invalid reference.
    pub(crate) fn resolve_assignee(&self, raw: Option<&str>) -> SyncResult<Option<User>> {
        let raw = match raw {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };
        let id = EntityId::parse(raw).ok_or_else(|| SyncError::invalid_reference(raw))?;
        let user = self
            .users
            .get(id)?
            .ok_or_else(|| SyncError::invalid_reference(raw))?;
        Ok(Some(user))
    }
}

/// Validates a required string field: present and non-empty.
pub(crate) fn required(value: Option<String>, field: &'static str) -> SyncResult<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(SyncError::missing_field(field)),
    }
}

/// Deduplicates requested task ids, preserving input order.
pub(crate) fn dedup_preserving_order(ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}
