//! Node-level error type.

use storage::StorageError;
use thiserror::Error;

/// Errors returned by a node's `execute` method.
///
/// The engine never retries; any of these aborts the run.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The node ran and could not produce an output.
    #[error("node failed: {0}")]
    Failed(String),

    /// The per-node configuration did not have the expected shape.
    #[error("invalid node config: {message}")]
    InvalidConfig { message: String },

    /// The merged upstream input did not have the expected shape.
    #[error("invalid node input: {message}")]
    InvalidInput { message: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl NodeError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
