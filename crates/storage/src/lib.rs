//! `storage` crate — the key-value handle shared by every node in a run.
//!
//! The engine never looks inside the handle; it only passes it through the
//! pipeline context to the nodes.
//! Concrete backings implement [`Storage`]; [`MemoryStorage`] is the one
//! shipped here.

pub mod error;
pub mod memory;

pub use error::StorageError;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use serde_json::Value;

/// A JSON key-value store.
///
/// All methods take `&self` so a single handle can be shared by reference
/// with every node of a run.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Remove `key`. Returns `true` if it was present.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// All keys currently stored, in no particular order.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}
