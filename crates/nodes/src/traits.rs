//! The `ExecutableNode` trait — the contract every node must fulfil.

use async_trait::async_trait;
use serde_json::Value;

use crate::{NodeError, PipelineContext};

/// The core node trait.
///
/// Instances come from a registry factory and live for one run only, so any
/// state a node keeps in `self` is scoped to that run.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    /// Stable tag the node is registered under.
    fn node_type(&self) -> &str;

    /// Execute the node.
    ///
    /// `input` is always a JSON object synthesised from the outputs of the
    /// node's upstream edges (empty for source nodes). `config` is the
    /// opaque per-node settings from the pipeline definition.
    async fn execute(
        &self,
        input: Value,
        config: &Value,
        ctx: &PipelineContext,
    ) -> Result<Value, NodeError>;
}
