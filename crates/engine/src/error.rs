//! Engine-level error types.

use nodes::NodeError;
use thiserror::Error;

/// Errors produced by the pipeline engine (validation + execution).
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Structural errors (nothing has run) ------

    /// Two or more nodes share the same ID.
    #[error("duplicate node ID: '{0}'")]
    DuplicateNodeId(String),

    /// An edge references a node ID that doesn't exist in the pipeline.
    #[error("edge references unknown node '{node_id}' ({side} side)")]
    UnknownNodeReference {
        node_id: String,
        side: &'static str,
    },

    /// Topological sort could not order every node.
    #[error("pipeline graph contains a cycle")]
    CycleDetected,

    // ------ Resolution errors ------

    /// No factory is registered for a node's `type`.
    #[error("unknown node type: '{0}'")]
    UnknownNodeType(String),

    // ------ Execution errors ------

    /// A node's `execute` returned an error; the run is aborted.
    #[error("node '{node_id}' failed: {source}")]
    NodeFailed {
        node_id: String,
        #[source]
        source: NodeError,
    },
}
