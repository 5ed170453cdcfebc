//! The Task entity and its assignment pointer.

use crate::entity::user::User;
use crate::entity::Entity;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use taskmirror_store::EntityId;
use time::OffsetDateTime;

/// Denormalized assignee name used when a task is unassigned.
pub const UNASSIGNED_NAME: &str = "unassigned";

/// A task's assignment pointer: either unassigned or one user id.
///
/// On the wire this is the `assignedUser` field: the empty string when
/// unassigned, the user's id string otherwise. The pointed-to user may
/// no longer exist: deleting a user leaves completed tasks' pointers
/// dangling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Assignment {
    /// No assignee.
    #[default]
    Unassigned,
    /// Assigned to the user with this id.
    Assigned(EntityId),
}

impl Assignment {
    /// Returns the assignee id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<EntityId> {
        match self {
            Assignment::Unassigned => None,
            Assignment::Assigned(id) => Some(*id),
        }
    }

    /// Returns true if no user is assigned.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        matches!(self, Assignment::Unassigned)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignment::Unassigned => Ok(()),
            Assignment::Assigned(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for Assignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Assignment::Unassigned => serializer.serialize_str(""),
            Assignment::Assigned(id) => serializer.collect_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for Assignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(Assignment::Unassigned);
        }
        EntityId::parse(&raw)
            .map(Assignment::Assigned)
            .ok_or_else(|| D::Error::custom(format!("invalid assigned user id: {raw}")))
    }
}

/// A task: the authoritative side of the assignment relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned id, immutable after creation.
    #[serde(skip)]
    id: EntityId,
    /// Display name, non-empty.
    pub name: String,
    /// Free-form description, defaults to empty.
    #[serde(default)]
    pub description: String,
    /// Caller-supplied deadline, treated as an opaque string.
    pub deadline: String,
    /// Completion flag, defaults to false.
    #[serde(default)]
    pub completed: bool,
    /// The assignment pointer (wire field `assignedUser`).
    #[serde(rename = "assignedUser", default)]
    pub assigned: Assignment,
    /// Denormalized copy of the assignee's name as of the last time the
    /// assignment was set; the literal `"unassigned"` otherwise.
    #[serde(default = "default_assigned_user_name")]
    pub assigned_user_name: String,
    /// Creation timestamp, immutable.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

fn default_assigned_user_name() -> String {
    UNASSIGNED_NAME.to_string()
}

impl Task {
    /// Creates a new unpersisted, unassigned task.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        deadline: impl Into<String>,
        completed: bool,
    ) -> Self {
        Self {
            id: EntityId::nil(),
            name: name.into(),
            description: description.into(),
            deadline: deadline.into(),
            completed,
            assigned: Assignment::Unassigned,
            assigned_user_name: default_assigned_user_name(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    /// Returns the task's id (nil until first save).
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the assignee's id, if any.
    #[must_use]
    pub fn assignee(&self) -> Option<EntityId> {
        self.assigned.user_id()
    }

    /// Points the assignment at a user, refreshing the denormalized
    /// name. Pending-set maintenance is the engine's job, not this
    /// method's.
    pub fn assign_to(&mut self, user: &User) {
        self.assigned = Assignment::Assigned(user.id());
        self.assigned_user_name = user.name.clone();
    }

    /// Clears the assignment and resets the denormalized name.
    pub fn clear_assignment(&mut self) {
        self.assigned = Assignment::Unassigned;
        self.assigned_user_name = default_assigned_user_name();
    }
}

impl Entity for Task {
    const COLLECTION: &'static str = "tasks";

    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn set_entity_id(&mut self, id: EntityId) {
        self.id = id;
    }
}
