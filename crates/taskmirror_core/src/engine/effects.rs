//! Side-effect counters and the human-readable note.

/// Counters describing the side effects one engine operation performed
/// on entities other than its primary one.
///
/// The note renders non-zero counters in a single fixed order:
/// reassigned, unassigned, addedPending, removedPending,
/// completedAssigned, completedNotReassigned, invalid. User-side
/// operations never touch the pending counters and task-side operations
/// never count invalid ids, so this one order yields both operation
/// families' documented orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideEffects {
    /// Tasks moved from one assignee to a different one.
    pub reassigned: u32,
    /// Tasks whose assignment was cleared.
    pub unassigned: u32,
    /// Tasks added to a user's pending set (task-side operations).
    pub added_pending: u32,
    /// Tasks removed from a user's pending set (task-side operations).
    pub removed_pending: u32,
    /// Completed tasks assigned without joining a pending set.
    pub completed_assigned: u32,
    /// Completed tasks left with their current assignee.
    pub completed_not_reassigned: u32,
    /// Task ids that did not resolve to an existing task.
    pub invalid: u32,
}

impl SideEffects {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if every counter is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Renders the note: non-zero counters in the fixed order, joined
    /// by `"; "`. Empty string when nothing happened.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut segments = Vec::new();
        let counters = [
            (self.reassigned, "task(s) reassigned"),
            (self.unassigned, "task(s) unassigned"),
            (self.added_pending, "task(s) added to pending"),
            (self.removed_pending, "task(s) removed from pending"),
            (self.completed_assigned, "completed task(s) assigned"),
            (
                self.completed_not_reassigned,
                "completed task(s) left with their assignee",
            ),
            (self.invalid, "invalid task id(s) skipped"),
        ];
        for (count, label) in counters {
            if count > 0 {
                segments.push(format!("{count} {label}"));
            }
        }
        segments.join("; ")
    }
}

/// An engine operation's result: the mutated primary entity plus the
/// side-effect counters its note derives from.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    /// The primary entity after the operation.
    pub entity: T,
    /// Side effects performed on other entities.
    pub effects: SideEffects,
}

impl<T> Outcome<T> {
    /// Creates an outcome.
    #[must_use]
    pub fn new(entity: T, effects: SideEffects) -> Self {
        Self { entity, effects }
    }

    /// Returns the human-readable side-effect note.
    #[must_use]
    pub fn note(&self) -> String {
        self.effects.summary()
    }
}
