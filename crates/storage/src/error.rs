//! Typed error type for the storage crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Seed data for a store must be a JSON object.
    #[error("storage seed must be a JSON object, got {0}")]
    InvalidSeed(&'static str),

    /// The backing store failed.
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
