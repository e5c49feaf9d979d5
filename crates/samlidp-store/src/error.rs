//! Error types for the store crate.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No value is stored under the key.
    #[error("key not found: {0}")]
    NotFound(String),

    /// Failed to (de)serialize a value.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// The backend is misconfigured or unavailable.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether this error only says the key is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
