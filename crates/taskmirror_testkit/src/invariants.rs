//! Mirror-invariant checkers.
//!
//! The engine promises that after every completed operation a user's
//! pending set is exactly the set of tasks assigned to them and not
//! completed, and that emails stay unique. These checkers read the
//! whole store and report every violation they find.

use std::collections::{HashMap, HashSet};
use taskmirror_core::{Entity, ListQuery, SyncEngine, Task, User};

/// Loads every user and task and returns one message per invariant
/// violation. Empty means the mirror holds.
///
/// A task whose assignment points at a user that no longer exists is
/// not a violation: DeleteUser clears incomplete tasks but leaves
/// completed ones pointing at the deleted user.
pub fn mirror_violations(engine: &SyncEngine) -> Vec<String> {
    let users = load_users(engine);
    let tasks = load_tasks(engine);
    let mut violations = Vec::new();

    let task_by_id: HashMap<_, _> = tasks.iter().map(|t| (t.id(), t)).collect();
    let user_ids: HashSet<_> = users.iter().map(User::id).collect();

    for user in &users {
        let mut seen = HashSet::new();
        for &task_id in &user.pending_tasks {
            if !seen.insert(task_id) {
                violations.push(format!(
                    "user {} lists task {task_id} as pending more than once",
                    user.id()
                ));
            }
            match task_by_id.get(&task_id) {
                None => violations.push(format!(
                    "user {} has pending task {task_id} that does not exist",
                    user.id()
                )),
                Some(task) => {
                    if task.assignee() != Some(user.id()) {
                        violations.push(format!(
                            "user {} has pending task {task_id} assigned elsewhere",
                            user.id()
                        ));
                    }
                    if task.completed {
                        violations.push(format!(
                            "user {} has completed task {task_id} in pending",
                            user.id()
                        ));
                    }
                }
            }
        }
    }

    for task in &tasks {
        if let Some(owner) = task.assignee() {
            if task.completed || !user_ids.contains(&owner) {
                continue;
            }
            let mirrored = users
                .iter()
                .any(|u| u.id() == owner && u.has_pending(task.id()));
            if !mirrored {
                violations.push(format!(
                    "task {} is assigned to user {owner} but missing from their pending set",
                    task.id()
                ));
            }
        }
    }

    let mut emails = HashMap::new();
    for user in &users {
        if let Some(other) = emails.insert(user.email.to_lowercase(), user.id()) {
            violations.push(format!(
                "users {other} and {} share email {}",
                user.id(),
                user.email
            ));
        }
    }

    violations
}

/// Panics with every violation if the mirror does not hold.
pub fn assert_mirror(engine: &SyncEngine) {
    let violations = mirror_violations(engine);
    assert!(
        violations.is_empty(),
        "mirror invariant violated:\n{}",
        violations.join("\n")
    );
}

fn load_users(engine: &SyncEngine) -> Vec<User> {
    engine
        .list_users(&ListQuery::new())
        .expect("failed to list users")
        .iter()
        .map(|doc| User::from_document(doc).expect("failed to decode user"))
        .collect()
}

fn load_tasks(engine: &SyncEngine) -> Vec<Task> {
    engine
        .list_tasks(&ListQuery::new())
        .expect("failed to list tasks")
        .iter()
        .map(|doc| Task::from_document(doc).expect("failed to decode task"))
        .collect()
}
