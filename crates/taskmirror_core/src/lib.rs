//! # taskmirror core
//!
//! Entities and the consistency-maintenance engine for taskmirror.
//!
//! Two peer entities live in a non-transactional document store:
//!
//! - **Tasks** hold the authoritative assignment pointer
//!   (`assignedUser`) plus a denormalized copy of the assignee's name
//! - **Users** hold a denormalized mirror of their assigned,
//!   not-yet-completed tasks (`pendingTasks`)
//!
//! Because the store offers no multi-document transaction, every
//! cross-entity change is a fixed-order sequence of independent reads
//! and writes. The [`SyncEngine`] owns those sequences: six operations
//! (create/update/delete per entity) that bring both sides of the
//! mirror back into agreement and report their side effects as a
//! human-readable note.
//!
//! ## Key Invariants
//!
//! After every completed operation (intermediate writes may transiently
//! violate them):
//!
//! - `assignedUserName` equals the assignee's name as of the last time
//!   the assignment was set (denormalization is not live-refreshed)
//! - A user's pending set is exactly the set of tasks assigned to them
//!   and not completed; completed tasks are never pending
//! - A task has at most one assignee
//! - Emails are unique across users, compared case-insensitively
//! - A completed task with an assignee is never reassigned to a
//!   different user; assigning a completed task never touches a
//!   pending set
//!
//! ## Concurrency
//!
//! Operations are sequential and non-reentrant. Two concurrent
//! operations touching the same user/task pair can interleave and leave
//! the mirror violated; production deployments need per-entity-pair
//! serialization or store-native transactions. A single store failure
//! aborts the remaining steps of an operation without rolling back
//! earlier writes.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod collection;
mod engine;
mod entity;
mod error;

pub use collection::Collection;
pub use engine::{Outcome, SideEffects, SyncEngine, TaskDraft, UserDraft};
pub use entity::{Assignment, Entity, Task, User, UNASSIGNED_NAME};
pub use error::{SyncError, SyncResult};

// Re-export the store boundary types callers need to drive the engine.
pub use taskmirror_store::{
    Document, DocumentStore, EntityId, Filter, ListQuery, Order, Projection, SortKey, StoreError,
};
