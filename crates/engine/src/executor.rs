//! Pipeline execution engine.
//!
//! `PipelineExecutor` is the central orchestrator:
//! 1. Validates the DAG and produces a topological ordering.
//! 2. Iterates through nodes in order, one at a time, instantiating each from
//!    the registry.
//! 3. Synthesises each node's input from its upstream outputs.
//! 4. Records every output in the caller's `PipelineContext`.
//!
//! Any failure aborts the run. Outputs recorded before the failure stay in
//! the context; nothing is retried or rolled back.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use nodes::PipelineContext;

use crate::dag::validate_pipeline;
use crate::merge::merge_inputs;
use crate::models::{Pipeline, PipelineNode};
use crate::{EngineError, NodeRegistry};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the executor.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Log every node's merged input and output at `debug` level.
    pub log_payloads: bool,
}

// ---------------------------------------------------------------------------
// Output of a completed execution
// ---------------------------------------------------------------------------

/// Snapshot of a successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub run_id: Uuid,
    /// Output of every node, keyed by node id.
    pub outputs: HashMap<String, Value>,
    /// Node ids in the order they ran.
    pub execution_order: Vec<String>,
    /// Wall-clock time of the whole run, validation included.
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineResult {
    pub fn output(&self, node_id: &str) -> Option<&Value> {
        self.outputs.get(node_id)
    }

    /// Output of the node that ran last, if any ran.
    pub fn last_output(&self) -> Option<&Value> {
        self.execution_order.last().and_then(|id| self.outputs.get(id))
    }
}

// ---------------------------------------------------------------------------
// PipelineExecutor
// ---------------------------------------------------------------------------

/// Runs pipelines against caller-supplied contexts.
///
/// The executor holds no per-run state, so one instance can serve any number
/// of runs, concurrently, as long as each has its own context.
#[derive(Debug, Clone, Default)]
pub struct PipelineExecutor {
    registry: NodeRegistry,
    config: ExecutorConfig,
}

impl PipelineExecutor {
    /// Create a new executor.
    pub fn new(registry: NodeRegistry, config: ExecutorConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Mutable access for registering node types after construction.
    pub fn registry_mut(&mut self) -> &mut NodeRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run `pipeline` to completion, recording outputs in `ctx`.
    ///
    /// # Errors
    /// - Structural ([`EngineError::CycleDetected`], duplicate ids, dangling
    ///   edges): returned before any node runs.
    /// - [`EngineError::UnknownNodeType`]: returned when the offending node is
    ///   reached; earlier outputs remain in `ctx`.
    /// - [`EngineError::NodeFailed`]: a node's own error, with its id.
    #[instrument(skip_all, fields(run_id = %ctx.run_id, nodes = pipeline.nodes.len()))]
    pub async fn execute(
        &self,
        pipeline: &Pipeline,
        ctx: &mut PipelineContext,
    ) -> Result<PipelineResult, EngineError> {
        let clock = Instant::now();
        let started_at = Utc::now();

        // ------------------------------------------------------------------
        // Validate and topologically sort the DAG.
        // ------------------------------------------------------------------
        let order = validate_pipeline(pipeline)?;
        info!("DAG validated — executing {} nodes in order: {:?}", order.len(), order);

        let node_map: HashMap<&str, &PipelineNode> = pipeline
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n))
            .collect();

        // ------------------------------------------------------------------
        // Execute nodes sequentially.
        // ------------------------------------------------------------------
        for node_id in &order {
            let node_def = node_map[node_id.as_str()];

            let node = self.registry.create(&node_def.node_type).map_err(|e| {
                error!("node '{}' cannot be instantiated: {}", node_id, e);
                e
            })?;

            let input = merge_inputs(node_id, pipeline.incoming(node_id), ctx.results());
            if self.config.log_payloads {
                debug!("node '{}' input: {}", node_id, input);
            }

            let output = match node.execute(input, &node_def.config, ctx).await {
                Ok(output) => output,
                Err(source) => {
                    error!("node '{}' ({}) failed: {}", node_id, node_def.node_type, source);
                    return Err(EngineError::NodeFailed {
                        node_id: node_id.clone(),
                        source,
                    });
                }
            };

            if self.config.log_payloads {
                debug!("node '{}' output: {}", node_id, output);
            } else {
                debug!("node '{}' ({}) succeeded", node_id, node_def.node_type);
            }
            ctx.record(node_id.clone(), output);
        }

        let duration_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!("pipeline run {} succeeded in {}ms", ctx.run_id, duration_ms);

        Ok(PipelineResult {
            run_id: ctx.run_id,
            outputs: ctx.results().to_map(),
            execution_order: order,
            duration_ms,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
