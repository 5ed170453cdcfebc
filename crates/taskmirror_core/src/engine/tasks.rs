//! Task-side operations: CreateTask, UpdateTask, DeleteTask.

use crate::engine::effects::{Outcome, SideEffects};
use crate::engine::{required, SyncEngine};
use crate::entity::{Task, User};
use crate::error::{SyncError, SyncResult};
use serde::Deserialize;
use taskmirror_store::EntityId;
use tracing::debug;

/// Request payload for CreateTask and UpdateTask.
///
/// `name` and `deadline` are required. `assigned_user` is the raw
/// `assignedUser` request value: absent or empty means unassigned; a
/// non-empty value that does not resolve to an existing user is an
/// invalid reference and rejects the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDraft {
    /// Display name.
    pub name: Option<String>,
    /// Free-form description; defaults to empty.
    pub description: Option<String>,
    /// Caller-supplied deadline, opaque.
    pub deadline: Option<String>,
    /// Completion flag; defaults to false.
    pub completed: Option<bool>,
    /// Requested assignee id string, or empty/absent for unassigned.
    pub assigned_user: Option<String>,
}

impl TaskDraft {
    /// Creates a draft with name and deadline set.
    #[must_use]
    pub fn new(name: impl Into<String>, deadline: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            deadline: Some(deadline.into()),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Sets the requested assignee.
    #[must_use]
    pub fn assigned_to(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_user = Some(user_id.into());
        self
    }
}

impl SyncEngine {
    /// Creates a task, mirroring it into the assignee's pending set
    /// when assigned and not completed.
    pub fn create_task(&self, draft: TaskDraft) -> SyncResult<Outcome<Task>> {
        let name = required(draft.name, "name")?;
        let deadline = required(draft.deadline, "deadline")?;
        let description = draft.description.unwrap_or_default();
        let completed = draft.completed.unwrap_or(false);
        let assignee = self.resolve_assignee(draft.assigned_user.as_deref())?;

        let mut task = Task::new(name, description, deadline, completed);
        if let Some(user) = &assignee {
            task.assign_to(user);
        }
        self.tasks.save(&mut task)?;

        if let Some(mut user) = assignee {
            if !completed {
                user.add_pending(task.id());
                self.users.save(&mut user)?;
            }
        }

        debug!(task = %task.id(), completed, "created task");
        Ok(Outcome::new(task, SideEffects::new()))
    }

    /// Replaces a task's fields (strict replace), maintaining both
    /// sides of the mirror.
    ///
    /// Completed tasks are guarded: one that already has an assignee is
    /// never handed to a different user (the field updates still apply,
    /// the assignment does not), and one gaining an assignee never
    /// joins a pending set.
    pub fn update_task(&self, id: EntityId, draft: TaskDraft) -> SyncResult<Outcome<Task>> {
        let mut task = self
            .tasks
            .get(id)?
            .ok_or_else(|| SyncError::task_not_found(id))?;
        let name = required(draft.name, "name")?;
        let deadline = required(draft.deadline, "deadline")?;
        let description = draft.description.unwrap_or_default();
        let completed = draft.completed.unwrap_or(false);
        let assignee = self.resolve_assignee(draft.assigned_user.as_deref())?;

        let old_owner = task.assignee();
        let old_completed = task.completed;
        let new_owner = assignee.as_ref().map(User::id);
        let mut effects = SideEffects::new();

        // Completed-task guard, evaluated before the general sync.
        if completed {
            match (old_owner, assignee.as_ref()) {
                (Some(old), Some(new)) if old != new.id() => {
                    // Reject the reassignment: field updates apply, the
                    // assignment stays put.
                    task.name = name;
                    task.description = description;
                    task.deadline = deadline;
                    task.completed = true;
                    effects.completed_not_reassigned += 1;
                    if !old_completed {
                        // Completing the task retires it from the
                        // current owner's pending set.
                        self.release_from_owner(old, task.id())?;
                        effects.removed_pending += 1;
                    }
                    self.tasks.save(&mut task)?;
                    debug!(task = %task.id(), "rejected reassignment of completed task");
                    return Ok(Outcome::new(task, effects));
                }
                (None, Some(user)) => {
                    // Completed tasks may gain an assignee but never
                    // join a pending set.
                    task.name = name;
                    task.description = description;
                    task.deadline = deadline;
                    task.completed = true;
                    task.assign_to(user);
                    self.tasks.save(&mut task)?;
                    effects.completed_assigned += 1;
                    debug!(task = %task.id(), "assigned completed task");
                    return Ok(Outcome::new(task, effects));
                }
                _ => {}
            }
        }

        // General path: apply every field update, then repair the
        // mirror on both sides.
        task.name = name;
        task.description = description;
        task.deadline = deadline;
        task.completed = completed;
        match assignee.as_ref() {
            Some(user) => task.assign_to(user),
            None => task.clear_assignment(),
        }

        if old_owner != new_owner {
            if let Some(old) = old_owner {
                self.release_from_owner(old, task.id())?;
                effects.unassigned += 1;
            }
            if let Some(mut user) = assignee {
                if !completed {
                    user.add_pending(task.id());
                    self.users.save(&mut user)?;
                    effects.reassigned += 1;
                    effects.added_pending += 1;
                }
            }
        } else if let Some(mut user) = assignee {
            // Same owner: only completion transitions move the task in
            // or out of the pending set.
            if !old_completed && completed {
                user.remove_pending(task.id());
                self.users.save(&mut user)?;
                effects.removed_pending += 1;
            } else if old_completed && !completed {
                user.add_pending(task.id());
                self.users.save(&mut user)?;
                effects.added_pending += 1;
            }
        }

        self.tasks.save(&mut task)?;
        debug!(task = %task.id(), completed, "updated task");
        Ok(Outcome::new(task, effects))
    }

    /// Deletes a task, removing it from its assignee's pending set.
    pub fn delete_task(&self, id: EntityId) -> SyncResult<Outcome<Task>> {
        let task = self
            .tasks
            .get(id)?
            .ok_or_else(|| SyncError::task_not_found(id))?;

        if let Some(owner) = task.assignee() {
            self.release_from_owner(owner, id)?;
        }
        self.tasks.delete(id)?;

        debug!(task = %id, "deleted task");
        Ok(Outcome::new(task, SideEffects::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::UserDraft;
    use crate::entity::UNASSIGNED_NAME;
    use std::sync::Arc;
    use taskmirror_store::MemoryStore;

    fn engine() -> SyncEngine {
        SyncEngine::new(Arc::new(MemoryStore::new()))
    }

    fn seeded_user(engine: &SyncEngine, name: &str) -> User {
        engine
            .create_user(UserDraft::new(name, format!("{name}@example.com")))
            .unwrap()
            .entity
    }

    #[test]
    fn create_task_requires_name_and_deadline() {
        let engine = engine();
        let err = engine
            .create_task(TaskDraft {
                name: Some("x".into()),
                ..TaskDraft::default()
            })
            .unwrap_err();
        assert!(err.is_validation());

        let err = engine
            .create_task(TaskDraft {
                deadline: Some("2026-09-01".into()),
                ..TaskDraft::default()
            })
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn create_task_defaults_description_and_completed() {
        let engine = engine();
        let task = engine
            .create_task(TaskDraft::new("bare", "2026-09-01"))
            .unwrap()
            .entity;
        assert_eq!(task.description, "");
        assert!(!task.completed);
        assert!(task.assignee().is_none());
        assert_eq!(task.assigned_user_name, UNASSIGNED_NAME);
    }

    #[test]
    fn create_task_rejects_unresolvable_assignee() {
        let engine = engine();
        let err = engine
            .create_task(TaskDraft::new("x", "2026-09-01").assigned_to(EntityId::new().to_string()))
            .unwrap_err();
        assert!(err.is_validation());

        let err = engine
            .create_task(TaskDraft::new("x", "2026-09-01").assigned_to("not-a-uuid"))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn create_task_empty_assignee_means_unassigned() {
        let engine = engine();
        let task = engine
            .create_task(TaskDraft::new("x", "2026-09-01").assigned_to(""))
            .unwrap()
            .entity;
        assert!(task.assignee().is_none());
    }

    #[test]
    fn create_task_assigned_incomplete_joins_pending() {
        let engine = engine();
        let alice = seeded_user(&engine, "alice");

        let task = engine
            .create_task(TaskDraft::new("x", "2026-09-01").assigned_to(alice.id().to_string()))
            .unwrap()
            .entity;

        assert_eq!(task.assignee(), Some(alice.id()));
        assert_eq!(task.assigned_user_name, "alice");
        let alice = engine.user(alice.id()).unwrap();
        assert!(alice.has_pending(task.id()));
    }

    #[test]
    fn create_task_completed_assigned_skips_pending() {
        let engine = engine();
        let alice = seeded_user(&engine, "alice");

        let task = engine
            .create_task(
                TaskDraft::new("x", "2026-09-01")
                    .completed(true)
                    .assigned_to(alice.id().to_string()),
            )
            .unwrap()
            .entity;

        assert_eq!(task.assignee(), Some(alice.id()));
        assert_eq!(task.assigned_user_name, "alice");
        let alice = engine.user(alice.id()).unwrap();
        assert!(!alice.has_pending(task.id()));
    }

    #[test]
    fn create_then_get_roundtrips_fields() {
        let engine = engine();
        let created = engine
            .create_task(
                TaskDraft::new("x", "2026-09-01")
                    .description("details")
                    .completed(true),
            )
            .unwrap()
            .entity;

        let fetched = engine.task(created.id()).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn update_task_missing_is_not_found() {
        let engine = engine();
        let err = engine
            .update_task(EntityId::new(), TaskDraft::new("x", "2026-09-01"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn update_task_guard_rejects_reassigning_completed_task() {
        let engine = engine();
        let alice = seeded_user(&engine, "alice");
        let bob = seeded_user(&engine, "bob");
        let task = engine
            .create_task(
                TaskDraft::new("done", "2026-09-01")
                    .completed(true)
                    .assigned_to(alice.id().to_string()),
            )
            .unwrap()
            .entity;

        let outcome = engine
            .update_task(
                task.id(),
                TaskDraft::new("done 2", "2026-10-01")
                    .completed(true)
                    .assigned_to(bob.id().to_string()),
            )
            .unwrap();

        // Field updates applied, assignment untouched
        assert_eq!(outcome.entity.name, "done 2");
        assert_eq!(outcome.entity.deadline, "2026-10-01");
        assert_eq!(outcome.entity.assignee(), Some(alice.id()));
        assert_eq!(outcome.entity.assigned_user_name, "alice");
        assert_eq!(outcome.effects.completed_not_reassigned, 1);
        assert_eq!(
            outcome.note(),
            "1 completed task(s) left with their assignee"
        );

        // Neither pending set changed
        assert!(!engine.user(alice.id()).unwrap().has_pending(task.id()));
        assert!(!engine.user(bob.id()).unwrap().has_pending(task.id()));
    }

    #[test]
    fn update_task_guard_retires_pending_when_completing_and_reassigning() {
        let engine = engine();
        let alice = seeded_user(&engine, "alice");
        let bob = seeded_user(&engine, "bob");
        let task = engine
            .create_task(TaskDraft::new("open", "2026-09-01").assigned_to(alice.id().to_string()))
            .unwrap()
            .entity;
        assert!(engine.user(alice.id()).unwrap().has_pending(task.id()));

        let outcome = engine
            .update_task(
                task.id(),
                TaskDraft::new("open", "2026-09-01")
                    .completed(true)
                    .assigned_to(bob.id().to_string()),
            )
            .unwrap();

        // Reassignment rejected, completion applied, mirror repaired
        assert_eq!(outcome.entity.assignee(), Some(alice.id()));
        assert!(outcome.entity.completed);
        assert_eq!(outcome.effects.completed_not_reassigned, 1);
        assert_eq!(outcome.effects.removed_pending, 1);
        assert!(!engine.user(alice.id()).unwrap().has_pending(task.id()));
        assert!(!engine.user(bob.id()).unwrap().has_pending(task.id()));
    }

    #[test]
    fn update_task_guard_allows_assigning_completed_unassigned_task() {
        let engine = engine();
        let alice = seeded_user(&engine, "alice");
        let task = engine
            .create_task(TaskDraft::new("done", "2026-09-01").completed(true))
            .unwrap()
            .entity;

        let outcome = engine
            .update_task(
                task.id(),
                TaskDraft::new("done", "2026-09-01")
                    .completed(true)
                    .assigned_to(alice.id().to_string()),
            )
            .unwrap();

        assert_eq!(outcome.entity.assignee(), Some(alice.id()));
        assert_eq!(outcome.effects.completed_assigned, 1);
        assert!(!engine.user(alice.id()).unwrap().has_pending(task.id()));
    }

    #[test]
    fn update_task_reassignment_cleans_both_pending_sets() {
        let engine = engine();
        let alice = seeded_user(&engine, "alice");
        let bob = seeded_user(&engine, "bob");
        let task = engine
            .create_task(TaskDraft::new("open", "2026-09-01").assigned_to(alice.id().to_string()))
            .unwrap()
            .entity;

        let outcome = engine
            .update_task(
                task.id(),
                TaskDraft::new("open", "2026-09-01").assigned_to(bob.id().to_string()),
            )
            .unwrap();

        assert_eq!(outcome.entity.assignee(), Some(bob.id()));
        assert_eq!(outcome.entity.assigned_user_name, "bob");
        assert_eq!(outcome.effects.unassigned, 1);
        assert_eq!(outcome.effects.reassigned, 1);
        assert_eq!(outcome.effects.added_pending, 1);

        assert!(!engine.user(alice.id()).unwrap().has_pending(task.id()));
        assert!(engine.user(bob.id()).unwrap().has_pending(task.id()));
    }

    #[test]
    fn update_task_unassigning_clears_pointer_and_pending() {
        let engine = engine();
        let alice = seeded_user(&engine, "alice");
        let task = engine
            .create_task(TaskDraft::new("open", "2026-09-01").assigned_to(alice.id().to_string()))
            .unwrap()
            .entity;

        let outcome = engine
            .update_task(task.id(), TaskDraft::new("open", "2026-09-01"))
            .unwrap();

        assert!(outcome.entity.assignee().is_none());
        assert_eq!(outcome.entity.assigned_user_name, UNASSIGNED_NAME);
        assert_eq!(outcome.effects.unassigned, 1);
        assert!(!engine.user(alice.id()).unwrap().has_pending(task.id()));
    }

    #[test]
    fn update_task_same_owner_completion_moves_pending_both_ways() {
        let engine = engine();
        let alice = seeded_user(&engine, "alice");
        let task = engine
            .create_task(TaskDraft::new("open", "2026-09-01").assigned_to(alice.id().to_string()))
            .unwrap()
            .entity;

        // incomplete -> completed
        let outcome = engine
            .update_task(
                task.id(),
                TaskDraft::new("open", "2026-09-01")
                    .completed(true)
                    .assigned_to(alice.id().to_string()),
            )
            .unwrap();
        assert_eq!(outcome.effects.removed_pending, 1);
        assert!(!engine.user(alice.id()).unwrap().has_pending(task.id()));

        // completed -> incomplete
        let outcome = engine
            .update_task(
                task.id(),
                TaskDraft::new("open", "2026-09-01")
                    .completed(false)
                    .assigned_to(alice.id().to_string()),
            )
            .unwrap();
        assert_eq!(outcome.effects.added_pending, 1);
        assert!(engine.user(alice.id()).unwrap().has_pending(task.id()));
    }

    #[test]
    fn update_task_same_owner_refreshes_denormalized_name() {
        let engine = engine();
        let alice = seeded_user(&engine, "alice");
        let task = engine
            .create_task(TaskDraft::new("open", "2026-09-01").assigned_to(alice.id().to_string()))
            .unwrap()
            .entity;

        engine
            .update_user(alice.id(), UserDraft::new("alicia", "alice@example.com")
                .with_pending([task.id().to_string()]))
            .unwrap();
        // Rename alone does not refresh the task's cached name
        assert_eq!(engine.task(task.id()).unwrap().assigned_user_name, "alice");

        // Re-setting the assignment through UpdateTask does
        let outcome = engine
            .update_task(
                task.id(),
                TaskDraft::new("open", "2026-09-01").assigned_to(alice.id().to_string()),
            )
            .unwrap();
        assert_eq!(outcome.entity.assigned_user_name, "alicia");
    }

    #[test]
    fn delete_task_removes_from_pending() {
        let engine = engine();
        let alice = seeded_user(&engine, "alice");
        let task = engine
            .create_task(TaskDraft::new("open", "2026-09-01").assigned_to(alice.id().to_string()))
            .unwrap()
            .entity;

        let outcome = engine.delete_task(task.id()).unwrap();
        assert_eq!(outcome.entity.id(), task.id());
        assert!(engine.task(task.id()).unwrap_err().is_not_found());
        assert!(!engine.user(alice.id()).unwrap().has_pending(task.id()));
    }

    #[test]
    fn delete_task_unassigned_is_fine() {
        let engine = engine();
        let task = engine
            .create_task(TaskDraft::new("open", "2026-09-01"))
            .unwrap()
            .entity;
        engine.delete_task(task.id()).unwrap();
        assert!(engine.task(task.id()).unwrap_err().is_not_found());
    }

    #[test]
    fn delete_task_missing_is_not_found() {
        let engine = engine();
        assert!(engine.delete_task(EntityId::new()).unwrap_err().is_not_found());
    }
}
