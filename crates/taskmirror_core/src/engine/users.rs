//! User-side operations: CreateUser, UpdateUser, DeleteUser.

use crate::engine::effects::{Outcome, SideEffects};
use crate::engine::{dedup_preserving_order, required, SyncEngine};
use crate::entity::User;
use crate::error::{SyncError, SyncResult};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use taskmirror_store::{EntityId, Filter};
use tracing::debug;

/// Request payload for CreateUser and UpdateUser.
///
/// `name` and `email` are required; absent and empty are treated the
/// same. `pending_tasks` carries the requested pending set as raw id
/// strings; ids that don't parse or don't resolve are counted invalid
/// and skipped, not rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDraft {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Requested pending task ids, in display order.
    pub pending_tasks: Vec<String>,
}

impl UserDraft {
    /// Creates a draft with name and email set.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            pending_tasks: Vec::new(),
        }
    }

    /// Sets the requested pending task ids.
    #[must_use]
    pub fn with_pending<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending_tasks = ids.into_iter().map(Into::into).collect();
        self
    }
}

impl SyncEngine {
    /// Creates a user, then attaches each requested pending task.
    ///
    /// Fails with a validation error on missing name/email and a
    /// conflict error on a case-insensitive email collision. Requested
    /// task ids are deduplicated and classified one at a time in input
    /// order; see [`UserDraft`] for how invalid ids are handled.
    pub fn create_user(&self, draft: UserDraft) -> SyncResult<Outcome<User>> {
        let name = required(draft.name, "name")?;
        let email = required(draft.email, "email")?;
        self.ensure_email_free(&email, None)?;

        let mut user = User::new(name, email);
        self.users.save(&mut user)?;

        let mut effects = SideEffects::new();
        for raw in dedup_preserving_order(&draft.pending_tasks) {
            self.attach_task(&mut user, raw, &mut effects)?;
        }
        self.users.save(&mut user)?;

        debug!(user = %user.id(), pending = user.pending_tasks.len(), "created user");
        Ok(Outcome::new(user, effects))
    }

    /// Replaces a user's fields and pending set (strict replace).
    ///
    /// Every previously pending task dropped from the request is
    /// released, clearing its assignment if still owned by this user
    /// (completed tasks get no exemption), then the requested set is
    /// attached with the same classification CreateUser uses.
    pub fn update_user(&self, id: EntityId, draft: UserDraft) -> SyncResult<Outcome<User>> {
        let mut user = self
            .users
            .get(id)?
            .ok_or_else(|| SyncError::user_not_found(id))?;
        let name = required(draft.name, "name")?;
        let email = required(draft.email, "email")?;
        self.ensure_email_free(&email, Some(id))?;

        let mut effects = SideEffects::new();
        let incoming = dedup_preserving_order(&draft.pending_tasks);
        let incoming_ids: HashSet<EntityId> =
            incoming.iter().filter_map(|raw| EntityId::parse(raw)).collect();

        // Old-state cleanup before new-state application.
        for task_id in user.pending_tasks.clone() {
            if incoming_ids.contains(&task_id) {
                continue;
            }
            if let Some(mut task) = self.tasks.get(task_id)? {
                if task.assignee() == Some(user.id()) {
                    task.clear_assignment();
                    self.tasks.save(&mut task)?;
                    effects.unassigned += 1;
                }
            }
        }

        user.name = name;
        user.email = email;
        user.pending_tasks.clear();
        for raw in incoming {
            self.attach_task(&mut user, raw, &mut effects)?;
        }
        self.users.save(&mut user)?;

        debug!(user = %user.id(), pending = user.pending_tasks.len(), "updated user");
        Ok(Outcome::new(user, effects))
    }

    /// Deletes a user, releasing their incomplete tasks.
    ///
    /// Every incomplete task assigned to the user has its assignment
    /// cleared; the `unassigned` counter reports how many. Completed
    /// tasks keep their now-dangling pointer to the deleted user.
    /// Returns the deleted user's last snapshot.
    pub fn delete_user(&self, id: EntityId) -> SyncResult<Outcome<User>> {
        let user = self
            .users
            .get(id)?
            .ok_or_else(|| SyncError::user_not_found(id))?;

        let mut effects = SideEffects::new();
        let stranded = self.tasks.find(
            &Filter::new()
                .eq("assignedUser", json!(id.to_string()))
                .eq("completed", json!(false)),
        )?;
        for mut task in stranded {
            task.clear_assignment();
            self.tasks.save(&mut task)?;
            effects.unassigned += 1;
        }

        self.users.delete(id)?;
        debug!(user = %id, unassigned = effects.unassigned, "deleted user");
        Ok(Outcome::new(user, effects))
    }

    /// Rejects the email if a different user already holds it,
    /// comparing case-insensitively.
    ///
    /// Check-then-act: without a store-native unique constraint a
    /// concurrent create can still slip a duplicate in.
    fn ensure_email_free(&self, email: &str, exclude: Option<EntityId>) -> SyncResult<()> {
        if let Some(existing) = self
            .users
            .find_one(&Filter::new().eq_ignore_case("email", email))?
        {
            if exclude != Some(existing.id()) {
                return Err(SyncError::duplicate_email(email));
            }
        }
        Ok(())
    }

    /// Classifies and attaches one requested pending task id.
    ///
    /// Mutates `user` in memory only; the caller persists the user once
    /// after the whole batch. Task writes happen immediately.
    fn attach_task(
        &self,
        user: &mut User,
        raw: &str,
        effects: &mut SideEffects,
    ) -> SyncResult<()> {
        let Some(task_id) = EntityId::parse(raw) else {
            effects.invalid += 1;
            return Ok(());
        };
        let Some(mut task) = self.tasks.get(task_id)? else {
            effects.invalid += 1;
            return Ok(());
        };

        if task.completed {
            match task.assignee() {
                // Completed tasks may gain an assignee but never join a
                // pending set, and are never taken from another user.
                None => {
                    task.assign_to(user);
                    self.tasks.save(&mut task)?;
                    effects.completed_assigned += 1;
                }
                Some(owner) if owner == user.id() => {}
                Some(_) => effects.completed_not_reassigned += 1,
            }
        } else {
            match task.assignee() {
                None => {
                    task.assign_to(user);
                    self.tasks.save(&mut task)?;
                    user.add_pending(task_id);
                }
                Some(owner) if owner == user.id() => user.add_pending(task_id),
                Some(previous) => {
                    self.release_from_owner(previous, task_id)?;
                    task.assign_to(user);
                    self.tasks.save(&mut task)?;
                    user.add_pending(task_id);
                    effects.reassigned += 1;
                }
            }
        }
        Ok(())
    }
}
