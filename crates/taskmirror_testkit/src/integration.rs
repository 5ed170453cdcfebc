//! Integration harness for operation sequences.
//!
//! Applies generated [`EngineOp`] sequences to a real engine, resolving
//! index-based references against the live population and verifying the
//! mirror invariant after every step.

use crate::failpoint::FailingStore;
use crate::fixtures::TestEngine;
use crate::generators::EngineOp;
use crate::invariants::assert_mirror;
use std::sync::Arc;
use taskmirror_core::{DocumentStore, EntityId, SyncEngine, TaskDraft, UserDraft};
use taskmirror_store::MemoryStore;

/// Applies operation sequences to an engine, tracking the live
/// user and task populations.
pub struct OpHarness {
    fixture: TestEngine,
    users: Vec<EntityId>,
    tasks: Vec<EntityId>,
}

impl OpHarness {
    /// Creates a harness over a fresh in-memory engine.
    pub fn new() -> Self {
        Self {
            fixture: TestEngine::new(),
            users: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Returns the engine under test.
    pub fn engine(&self) -> &SyncEngine {
        &self.fixture
    }

    /// Returns the ids of users created and not yet deleted.
    pub fn live_users(&self) -> &[EntityId] {
        &self.users
    }

    /// Returns the ids of tasks created and not yet deleted.
    pub fn live_tasks(&self) -> &[EntityId] {
        &self.tasks
    }

    /// Applies every operation in order, checking the mirror invariant
    /// after each one.
    pub fn run(&mut self, ops: &[EngineOp]) {
        for op in ops {
            self.apply(op);
            assert_mirror(&self.fixture);
        }
    }

    /// Applies one operation.
    ///
    /// Duplicate emails are the only rejection a generated sequence can
    /// legitimately produce; anything else panics. Operations targeting
    /// an empty population are skipped.
    pub fn apply(&mut self, op: &EngineOp) {
        match op {
            EngineOp::CreateUser { name, email } => {
                match self.fixture.create_user(UserDraft::new(name, email)) {
                    Ok(outcome) => self.users.push(outcome.entity.id()),
                    Err(e) => assert!(e.is_conflict(), "unexpected create_user error: {e}"),
                }
            }
            EngineOp::UpdateUser {
                user,
                name,
                pending,
                include_bogus_task,
            } => {
                let Some(id) = pick(&self.users, *user) else {
                    return;
                };
                let email = self.fixture.user(id).expect("live user").email;
                let mut requested: Vec<String> = pending
                    .iter()
                    .filter_map(|i| pick(&self.tasks, *i))
                    .map(|t| t.to_string())
                    .collect();
                if *include_bogus_task {
                    requested.push(EntityId::new().to_string());
                }
                self.fixture
                    .update_user(id, UserDraft::new(name, email).with_pending(requested))
                    .expect("update_user failed");
            }
            EngineOp::DeleteUser { user } => {
                let Some(id) = pick(&self.users, *user) else {
                    return;
                };
                self.users.retain(|u| *u != id);
                self.fixture.delete_user(id).expect("delete_user failed");
            }
            EngineOp::CreateTask {
                name,
                deadline,
                completed,
                assign_to,
            } => {
                let mut draft = TaskDraft::new(name, deadline).completed(*completed);
                if let Some(owner) = assign_to.and_then(|i| pick(&self.users, i)) {
                    draft = draft.assigned_to(owner.to_string());
                }
                let outcome = self.fixture.create_task(draft).expect("create_task failed");
                self.tasks.push(outcome.entity.id());
            }
            EngineOp::UpdateTask {
                task,
                completed,
                assign_to,
            } => {
                let Some(id) = pick(&self.tasks, *task) else {
                    return;
                };
                let current = self.fixture.task(id).expect("live task");
                let mut draft =
                    TaskDraft::new(current.name, current.deadline).completed(*completed);
                if let Some(owner) = assign_to.and_then(|i| pick(&self.users, i)) {
                    draft = draft.assigned_to(owner.to_string());
                }
                self.fixture.update_task(id, draft).expect("update_task failed");
            }
            EngineOp::DeleteTask { task } => {
                let Some(id) = pick(&self.tasks, *task) else {
                    return;
                };
                self.tasks.retain(|t| *t != id);
                self.fixture.delete_task(id).expect("delete_task failed");
            }
        }
    }
}

impl Default for OpHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn pick(population: &[EntityId], index: usize) -> Option<EntityId> {
    if population.is_empty() {
        None
    } else {
        Some(population[index % population.len()])
    }
}

/// Builds an engine over a fault-injecting store.
///
/// Returns the engine, the failpoint handle for arming, and the inner
/// store for inspecting what survived a partial failure.
pub fn engine_with_failpoint() -> (SyncEngine, Arc<FailingStore>, Arc<MemoryStore>) {
    let inner = Arc::new(MemoryStore::new());
    let failing = Arc::new(FailingStore::new(inner.clone() as Arc<dyn DocumentStore>));
    let engine = SyncEngine::new(failing.clone() as Arc<dyn DocumentStore>);
    (engine, failing, inner)
}
