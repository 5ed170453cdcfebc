//! # taskmirror Testkit
//!
//! Test utilities for taskmirror.
//!
//! This crate provides:
//! - Test fixtures and engine helpers
//! - Property-based test generators using proptest
//! - A fault-injecting store wrapper for partial-failure tests
//! - Mirror-invariant checkers
//! - An integration harness that applies random operation sequences
//!
//! ## Usage
//!
//! ```rust,ignore
//! use taskmirror_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_engine() {
//!     with_engine(|engine| {
//!         let alice = engine.create_user(UserDraft::new("alice", "a@example.com"))?;
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod failpoint;
pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod invariants;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::failpoint::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::invariants::*;
}

pub use failpoint::*;
pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use invariants::*;
