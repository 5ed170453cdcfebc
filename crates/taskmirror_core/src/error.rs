//! Error types for sync engine operations.

use taskmirror_store::{EntityId, StoreError};
use thiserror::Error;

/// Result type for sync engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync engine operations.
///
/// The kinds map onto the failure classes an HTTP layer needs to
/// distinguish: validation (reject, no mutation), conflict (reject, no
/// mutation), not-found (reject, no mutation), and storage (internal
/// failure, possibly after earlier writes committed).
#[derive(Debug, Error)]
pub enum SyncError {
    /// A required field is missing or a supplied reference is invalid.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the problem.
        message: String,
    },

    /// Another user already holds this email (case-insensitive).
    #[error("email already in use: {email}")]
    Conflict {
        /// The conflicting email as supplied by the caller.
        email: String,
    },

    /// A by-id operation referenced an entity that does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind ("user" or "task").
        kind: &'static str,
        /// The id that was not found.
        id: EntityId,
    },

    /// The underlying store failed.
    ///
    /// Earlier writes of the aborted operation are not rolled back.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl SyncError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a missing-required-field validation error.
    pub fn missing_field(field: &str) -> Self {
        Self::validation(format!("required field missing: {field}"))
    }

    /// Creates an invalid-reference validation error.
    pub fn invalid_reference(raw: &str) -> Self {
        Self::validation(format!("assigned user does not exist: {raw}"))
    }

    /// Creates a duplicate-email conflict error.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::Conflict {
            email: email.into(),
        }
    }

    /// Creates a user-not-found error.
    pub fn user_not_found(id: EntityId) -> Self {
        Self::NotFound { kind: "user", id }
    }

    /// Creates a task-not-found error.
    pub fn task_not_found(id: EntityId) -> Self {
        Self::NotFound { kind: "task", id }
    }

    /// Returns true for validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns true for email conflicts.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns true for not-found failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for store failures.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_predicates() {
        assert!(SyncError::missing_field("name").is_validation());
        assert!(SyncError::invalid_reference("abc").is_validation());
        assert!(SyncError::duplicate_email("a@b.c").is_conflict());
        assert!(SyncError::user_not_found(EntityId::new()).is_not_found());
        assert!(SyncError::task_not_found(EntityId::new()).is_not_found());
        assert!(SyncError::from(StoreError::backend("down")).is_storage());
    }

    #[test]
    fn messages_name_the_entity_kind() {
        let id = EntityId::new();
        assert_eq!(
            SyncError::user_not_found(id).to_string(),
            format!("user not found: {id}")
        );
        assert_eq!(
            SyncError::task_not_found(id).to_string(),
            format!("task not found: {id}")
        );
    }
}
