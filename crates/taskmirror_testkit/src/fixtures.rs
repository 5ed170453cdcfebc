//! Test fixtures and engine helpers.
//!
//! Provides convenience functions for setting up test engines
//! and common test scenarios.

use std::sync::Arc;
use taskmirror_core::{SyncEngine, Task, TaskDraft, User, UserDraft};
use taskmirror_store::{DocumentStore, MemoryStore};

/// A test engine over an in-memory store.
///
/// Keeps a direct handle to the backing store so tests can inspect raw
/// documents behind the engine's back.
pub struct TestEngine {
    /// The engine instance.
    pub engine: SyncEngine,
    /// The backing store.
    pub store: Arc<MemoryStore>,
}

impl TestEngine {
    /// Creates a new engine over a fresh in-memory store.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            engine: SyncEngine::new(store.clone() as Arc<dyn DocumentStore>),
            store,
        }
    }

    /// Creates a second engine sharing this fixture's store.
    ///
    /// Useful for verifying that state observed through one engine is
    /// real store state and not something cached in the first.
    pub fn reopen(&self) -> SyncEngine {
        SyncEngine::new(self.store.clone() as Arc<dyn DocumentStore>)
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestEngine {
    type Target = SyncEngine;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

/// Runs a test with an engine over a fresh in-memory store.
pub fn with_engine<F, R>(f: F) -> R
where
    F: FnOnce(&SyncEngine) -> R,
{
    let fixture = TestEngine::new();
    f(&fixture.engine)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates `size` users named `user0`, `user1`, ... with matching
    /// unique emails.
    pub fn team(engine: &SyncEngine, size: usize) -> Vec<User> {
        (0..size)
            .map(|i| {
                let name = format!("user{i}");
                engine
                    .create_user(UserDraft::new(&name, format!("{name}@example.com")))
                    .expect("failed to create user")
                    .entity
            })
            .collect()
    }

    /// Creates `per_user` incomplete tasks assigned to each given user.
    pub fn workload(engine: &SyncEngine, users: &[User], per_user: usize) -> Vec<Task> {
        let mut tasks = Vec::with_capacity(users.len() * per_user);
        for user in users {
            for i in 0..per_user {
                let task = engine
                    .create_task(
                        TaskDraft::new(format!("{}-task{i}", user.name), "2026-12-31")
                            .assigned_to(user.id().to_string()),
                    )
                    .expect("failed to create task")
                    .entity;
                tasks.push(task);
            }
        }
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::mirror_violations;

    #[test]
    fn team_scenario_creates_unique_users() {
        let fixture = TestEngine::new();
        let users = scenarios::team(&fixture, 3);
        assert_eq!(users.len(), 3);
        assert_eq!(fixture.count_users(&taskmirror_core::Filter::new()).unwrap(), 3);
    }

    #[test]
    fn workload_scenario_preserves_mirror() {
        let fixture = TestEngine::new();
        let users = scenarios::team(&fixture, 2);
        let tasks = scenarios::workload(&fixture, &users, 3);
        assert_eq!(tasks.len(), 6);
        assert!(mirror_violations(&fixture.engine).is_empty());

        let alice = fixture.user(users[0].id()).unwrap();
        assert_eq!(alice.pending_tasks.len(), 3);
    }

    #[test]
    fn with_engine_runs_against_a_fresh_store() {
        let created = with_engine(|engine| {
            scenarios::team(engine, 2);
            engine.count_users(&taskmirror_core::Filter::new()).unwrap()
        });
        assert_eq!(created, 2);

        // Each call gets its own store
        let count = with_engine(|engine| {
            engine.count_users(&taskmirror_core::Filter::new()).unwrap()
        });
        assert_eq!(count, 0);
    }

    #[test]
    fn reopened_engine_sees_same_state() {
        let fixture = TestEngine::new();
        let users = scenarios::team(&fixture, 1);
        let reopened = fixture.reopen();
        assert_eq!(reopened.user(users[0].id()).unwrap().name, "user0");
    }
}
