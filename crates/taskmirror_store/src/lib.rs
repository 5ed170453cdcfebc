//! # taskmirror store
//!
//! Document-store capability for taskmirror.
//!
//! This crate defines the storage boundary the sync engine is written
//! against. Stores are **schemaless document collections**: they hold
//! JSON documents keyed by entity id and answer structured queries, but
//! they know nothing about Users, Tasks, or the mirror invariant.
//!
//! ## Design Principles
//!
//! - Every store call is an independent read or write; there is no
//!   multi-document transaction and no retry
//! - Filtering, sorting, projection, and pagination are capabilities of
//!   the store, expressed as data ([`Filter`], [`ListQuery`])
//! - Ids are store-assigned on first save and immutable afterwards
//! - Implementations must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`MemoryStore`] - thread-safe in-memory store, insertion-ordered
//!
//! ## Example
//!
//! ```rust
//! use taskmirror_store::{Document, DocumentStore, Filter, MemoryStore};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! let mut doc = Document::new();
//! doc.set("name", json!("laundry"));
//! let saved = store.save("tasks", doc).unwrap();
//! assert!(!saved.id().is_nil());
//!
//! let found = store
//!     .find_one("tasks", &Filter::new().eq("name", json!("laundry")))
//!     .unwrap();
//! assert_eq!(found.map(|d| d.id()), Some(saved.id()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod id;
mod memory;
mod query;
mod store;

pub use document::Document;
pub use error::{StoreError, StoreResult};
pub use id::EntityId;
pub use memory::MemoryStore;
pub use query::{Condition, Filter, ListQuery, Order, Projection, SortKey};
pub use store::DocumentStore;
