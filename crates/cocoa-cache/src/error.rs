//! Key-Value store error types.

use thiserror::Error;

/// Errors that can occur when using the store.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("failed to open store: {0}")]
    Open(String),

    /// Failed to serialize or deserialize a value.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A store operation failed.
    #[error("store operation failed: {0}")]
    Store(String),

    /// Key not found.
    #[error("key not found: {0}")]
    NotFound(String),

    /// Concurrent modification detected.
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),
}
