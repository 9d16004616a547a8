//! DAG validation — the executor runs this before any node executes.
//!
//! Rules enforced:
//! 1. Node IDs must be unique within the pipeline.
//! 2. Every edge must reference valid node IDs (both `from` and `to`).
//! 3. The directed graph must be acyclic (topological sort must succeed).
//!
//! Returns a topologically-sorted list of node IDs on success.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{models::Pipeline, EngineError};

/// Validate the pipeline's DAG and return nodes in execution order.
///
/// # Errors
/// - [`EngineError::DuplicateNodeId`] if two nodes share an ID.
/// - [`EngineError::UnknownNodeReference`] if an edge references a missing node.
/// - [`EngineError::CycleDetected`] if the graph is not acyclic.
pub fn validate_pipeline(pipeline: &Pipeline) -> Result<Vec<String>, EngineError> {
    // -----------------------------------------------------------------------
    // 1. Ensure node IDs are unique
    // -----------------------------------------------------------------------
    let mut node_set: HashSet<&str> = HashSet::with_capacity(pipeline.nodes.len());
    for node in &pipeline.nodes {
        if !node_set.insert(node.id.as_str()) {
            return Err(EngineError::DuplicateNodeId(node.id.clone()));
        }
    }

    // -----------------------------------------------------------------------
    // 2. Validate edge endpoints
    // -----------------------------------------------------------------------
    for edge in &pipeline.edges {
        if !node_set.contains(edge.from.as_str()) {
            return Err(EngineError::UnknownNodeReference {
                node_id: edge.from.clone(),
                side: "from",
            });
        }
        if !node_set.contains(edge.to.as_str()) {
            return Err(EngineError::UnknownNodeReference {
                node_id: edge.to.clone(),
                side: "to",
            });
        }
    }

    // -----------------------------------------------------------------------
    // 3. Topological sort
    // -----------------------------------------------------------------------
    topological_order(pipeline)
}

/// Order the pipeline's nodes with Kahn's algorithm.
///
/// Nodes that become ready at the same time run in the order they became
/// ready: sources in node-list order, successors in edge-list order. The
/// result is therefore stable for a fixed definition.
///
/// # Errors
/// [`EngineError::CycleDetected`] if fewer nodes could be ordered than exist.
pub fn topological_order(pipeline: &Pipeline) -> Result<Vec<String>, EngineError> {
    // Build adjacency list and in-degree map.
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();

    for node in &pipeline.nodes {
        adjacency.entry(node.id.as_str()).or_default();
        in_degree.entry(node.id.as_str()).or_insert(0);
    }

    for edge in &pipeline.edges {
        adjacency
            .entry(edge.from.as_str())
            .or_default()
            .push(edge.to.as_str());
        *in_degree.entry(edge.to.as_str()).or_insert(0) += 1;
    }

    // Seed the queue with nodes that have no incoming edges, in node order.
    let mut queue: VecDeque<&str> = pipeline
        .nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();

    let mut sorted: Vec<String> = Vec::with_capacity(pipeline.nodes.len());

    while let Some(node_id) = queue.pop_front() {
        sorted.push(node_id.to_owned());

        if let Some(neighbours) = adjacency.get(node_id) {
            for &neighbour in neighbours {
                if let Some(deg) = in_degree.get_mut(neighbour) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push_back(neighbour);
                    }
                }
            }
        }
    }

    // If we didn't visit every node the graph contains a cycle.
    if sorted.len() != pipeline.nodes.len() {
        return Err(EngineError::CycleDetected);
    }

    Ok(sorted)
}
