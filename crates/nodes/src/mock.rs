//! `MockNode` — a test double for `ExecutableNode`.
//!
//! Useful in unit and integration tests where a real node implementation is
//! either unavailable or irrelevant. Clones share the call log, so a registry
//! factory can hand out fresh clones while the test keeps one to inspect.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::{ExecutableNode, NodeError, PipelineContext};

/// Behaviour injected into `MockNode` at construction time.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// Return a specific JSON value.
    ReturnValue(Value),
    /// Fail with [`NodeError::Failed`].
    Fail(String),
}

/// A single recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub input: Value,
    pub config: Value,
}

/// A mock node that records every call it receives and returns a
/// programmer-specified result.
#[derive(Debug, Clone)]
pub struct MockNode {
    /// Registry tag reported by `node_type`.
    pub node_type: String,
    /// What the node will do when `execute` is called.
    pub behaviour: MockBehaviour,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockNode {
    /// Create a mock that always succeeds with the given value.
    pub fn returning(node_type: impl Into<String>, value: Value) -> Self {
        Self {
            node_type: node_type.into(),
            behaviour: MockBehaviour::ReturnValue(value),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always fails.
    pub fn failing(node_type: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            behaviour: MockBehaviour::Fail(msg.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times this node (or any clone of it) has been executed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Every invocation seen so far, in call order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ExecutableNode for MockNode {
    fn node_type(&self) -> &str {
        &self.node_type
    }

    async fn execute(
        &self,
        input: Value,
        config: &Value,
        _ctx: &PipelineContext,
    ) -> Result<Value, NodeError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall { input, config: config.clone() });
        }

        match &self.behaviour {
            MockBehaviour::ReturnValue(v) => Ok(v.clone()),
            MockBehaviour::Fail(msg) => Err(NodeError::Failed(msg.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn clones_share_the_call_log() {
        let ctx = PipelineContext::in_memory();
        let mock = MockNode::returning("probe", json!({ "ok": true }));
        let clone = mock.clone();

        let out = clone.execute(json!({ "x": 1 }), &json!("cfg"), &ctx).await.unwrap();

        assert_eq!(out, json!({ "ok": true }));
        assert_eq!(mock.call_count(), 1);
        assert_eq!(
            mock.calls(),
            vec![MockCall { input: json!({ "x": 1 }), config: json!("cfg") }]
        );
    }

    #[tokio::test]
    async fn failing_mock_returns_failed() {
        let ctx = PipelineContext::in_memory();
        let mock = MockNode::failing("flaky", "upstream timed out");

        let err = mock.execute(json!({}), &Value::Null, &ctx).await.unwrap_err();
        assert!(matches!(err, NodeError::Failed(msg) if msg == "upstream timed out"));
        assert_eq!(mock.call_count(), 1);
    }
}
