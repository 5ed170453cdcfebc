//! The User entity.

use crate::entity::Entity;
use serde::{Deserialize, Serialize};
use taskmirror_store::EntityId;
use time::OffsetDateTime;

/// A user: name, unique email, and the pending-task mirror.
///
/// `pending_tasks` is a denormalized projection of the tasks assigned to
/// this user that are not yet completed. It is maintained exclusively by
/// the sync engine through [`User::add_pending`] and
/// [`User::remove_pending`]; nothing else mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned id, immutable after creation.
    #[serde(skip)]
    id: EntityId,
    /// Display name, non-empty.
    pub name: String,
    /// Email, non-empty, unique across users case-insensitively.
    pub email: String,
    /// Ids of assigned, not-yet-completed tasks. Insertion order is
    /// preserved for display; duplicates are forbidden.
    #[serde(default)]
    pub pending_tasks: Vec<EntityId>,
    /// Creation timestamp, immutable.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Creates a new unpersisted user with an empty pending set.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: EntityId::nil(),
            name: name.into(),
            email: email.into(),
            pending_tasks: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Returns the user's id (nil until first save).
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Inserts a task id into the pending set if absent. Idempotent.
    pub fn add_pending(&mut self, task_id: EntityId) {
        if !self.pending_tasks.contains(&task_id) {
            self.pending_tasks.push(task_id);
        }
    }

    /// Removes a task id from the pending set if present. Idempotent.
    pub fn remove_pending(&mut self, task_id: EntityId) {
        self.pending_tasks.retain(|id| *id != task_id);
    }

    /// Returns true if the task id is in the pending set.
    #[must_use]
    pub fn has_pending(&self, task_id: EntityId) -> bool {
        self.pending_tasks.contains(&task_id)
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "users";

    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn set_entity_id(&mut self, id: EntityId) {
        self.id = id;
    }
}
