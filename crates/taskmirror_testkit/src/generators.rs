//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random request payloads and
//! operation sequences for the engine. Entity references are generated
//! as indices and resolved against the live population at apply time by
//! the integration harness, so sequences stay meaningful under
//! shrinking.

use proptest::prelude::*;

/// Strategy for generating display names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{3,12}").expect("Invalid regex")
}

/// Strategy for generating email local parts.
///
/// Generates mixed case so tests exercise the case-insensitive
/// uniqueness comparison.
pub fn email_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9]{3,10}")
        .expect("Invalid regex")
        .prop_map(|local| format!("{local}@example.com"))
}

/// Strategy for generating deadline strings.
pub fn deadline_strategy() -> impl Strategy<Value = String> {
    (2024u32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}"))
}

/// One engine operation with index-based entity references.
///
/// `user` and `task` indices are taken modulo the live population when
/// applied; an operation targeting an empty population is a no-op.
#[derive(Debug, Clone)]
pub enum EngineOp {
    /// Create a user with no pending tasks.
    CreateUser {
        /// Display name.
        name: String,
        /// Email; duplicates are possible and must be rejected.
        email: String,
    },
    /// Replace a user, requesting a new pending set.
    UpdateUser {
        /// Index into the live users.
        user: usize,
        /// New display name.
        name: String,
        /// Indices into the live tasks to request as pending.
        pending: Vec<usize>,
        /// Whether to append an id that resolves to no task.
        include_bogus_task: bool,
    },
    /// Delete a user.
    DeleteUser {
        /// Index into the live users.
        user: usize,
    },
    /// Create a task.
    CreateTask {
        /// Display name.
        name: String,
        /// Deadline string.
        deadline: String,
        /// Completion flag.
        completed: bool,
        /// Index into the live users to assign to, if any.
        assign_to: Option<usize>,
    },
    /// Replace a task.
    UpdateTask {
        /// Index into the live tasks.
        task: usize,
        /// New completion flag.
        completed: bool,
        /// Index into the live users to assign to, if any.
        assign_to: Option<usize>,
    },
    /// Delete a task.
    DeleteTask {
        /// Index into the live tasks.
        task: usize,
    },
}

/// Strategy for generating a single engine operation.
pub fn engine_op_strategy() -> impl Strategy<Value = EngineOp> {
    prop_oneof![
        2 => (name_strategy(), email_strategy())
            .prop_map(|(name, email)| EngineOp::CreateUser { name, email }),
        2 => (
            any::<usize>(),
            name_strategy(),
            prop::collection::vec(any::<usize>(), 0..4),
            prop::bool::weighted(0.2),
        )
            .prop_map(|(user, name, pending, include_bogus_task)| EngineOp::UpdateUser {
                user,
                name,
                pending,
                include_bogus_task,
            }),
        1 => any::<usize>().prop_map(|user| EngineOp::DeleteUser { user }),
        3 => (
            name_strategy(),
            deadline_strategy(),
            any::<bool>(),
            prop::option::of(any::<usize>()),
        )
            .prop_map(|(name, deadline, completed, assign_to)| EngineOp::CreateTask {
                name,
                deadline,
                completed,
                assign_to,
            }),
        3 => (any::<usize>(), any::<bool>(), prop::option::of(any::<usize>()))
            .prop_map(|(task, completed, assign_to)| EngineOp::UpdateTask {
                task,
                completed,
                assign_to,
            }),
        1 => any::<usize>().prop_map(|task| EngineOp::DeleteTask { task }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn op_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<EngineOp>> {
    prop::collection::vec(engine_op_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn names_are_lowercase_ascii(name in name_strategy()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().all(|c| c.is_ascii_lowercase()));
        }

        #[test]
        fn emails_have_a_domain(email in email_strategy()) {
            prop_assert!(email.ends_with("@example.com"));
        }

        #[test]
        fn deadlines_are_date_shaped(deadline in deadline_strategy()) {
            prop_assert_eq!(deadline.len(), 10);
            prop_assert_eq!(deadline.as_bytes()[4], b'-');
            prop_assert_eq!(deadline.as_bytes()[7], b'-');
        }
    }
}
