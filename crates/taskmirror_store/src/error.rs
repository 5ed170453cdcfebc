//! Error types for store operations.

use crate::id::EntityId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document not found for a by-id operation that requires existence.
    #[error("document not found: {id} in collection {collection}")]
    DocumentNotFound {
        /// Collection that was searched.
        collection: String,
        /// The id that was not found.
        id: EntityId,
    },

    /// A document failed to encode or decode.
    #[error("invalid document: {message}")]
    InvalidDocument {
        /// Description of the problem.
        message: String,
    },

    /// The underlying backend failed.
    ///
    /// For the in-memory store this never occurs; network or disk stores
    /// surface their transport failures here.
    #[error("backend failure: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

impl StoreError {
    /// Creates a document-not-found error.
    pub fn not_found(collection: impl Into<String>, id: EntityId) -> Self {
        Self::DocumentNotFound {
            collection: collection.into(),
            id,
        }
    }

    /// Creates an invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Creates a backend failure error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
