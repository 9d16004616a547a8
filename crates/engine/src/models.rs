//! Pipeline definition types.
//!
//! A pipeline is plain data. Its JSON form is
//! `{ "nodes": [{ "id", "type", "config" }], "edges": [{ "from", "to", "mapping"? }] }`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// PipelineNode
// ---------------------------------------------------------------------------

/// A single step in the pipeline graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineNode {
    /// Unique identifier within this pipeline (referenced by edges).
    pub id: String,
    /// Registry key of the node implementation.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Opaque settings passed to the node at execution time.
    #[serde(default)]
    pub config: Value,
}

impl PipelineNode {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>, config: Value) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            config,
        }
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// Directed data dependency from one node to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// `source field -> target field`. When present only these fields of the
    /// producer's output reach the consumer, renamed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<BTreeMap<String, String>>,
}

impl Edge {
    /// Edge that merges the whole upstream output.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            mapping: None,
        }
    }

    /// Edge that copies only the listed `(source, target)` fields.
    pub fn mapped<I, S, T>(from: impl Into<String>, to: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            from: from.into(),
            to: to.into(),
            mapping: Some(
                fields
                    .into_iter()
                    .map(|(source, target)| (source.into(), target.into()))
                    .collect(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// A complete pipeline definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub nodes: Vec<PipelineNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(
        mut self,
        id: impl Into<String>,
        node_type: impl Into<String>,
        config: Value,
    ) -> Self {
        self.nodes.push(PipelineNode::new(id, node_type, config));
        self
    }

    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn node(&self, id: &str) -> Option<&PipelineNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges terminating at `node_id`, in definition order.
    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.to == node_id)
    }
}
