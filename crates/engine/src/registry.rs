//! Node registry — maps a node `type` string to a factory.
//!
//! Factories rather than shared instances: every run gets fresh node values,
//! so any state a node keeps is scoped to that run. Types are resolved when a
//! node is about to execute, so registration may happen at any point before
//! then.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use nodes::builtin::{ConstNode, LoadNode, PassthroughNode, StoreNode};
use nodes::{ExecutableNode, Typed, TypedNode};

use crate::EngineError;

/// Zero-argument constructor for a node instance.
pub type NodeFactory = Arc<dyn Fn() -> Box<dyn ExecutableNode> + Send + Sync>;

#[derive(Clone, Default)]
pub struct NodeRegistry {
    factories: HashMap<String, NodeFactory>,
}

impl NodeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the generic built-in nodes (`const`, `passthrough`,
    /// `store`, `load`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_node::<ConstNode>();
        registry.register_node::<PassthroughNode>();
        registry.register_typed::<StoreNode>();
        registry.register_typed::<LoadNode>();
        registry
    }

    /// Store `factory` under `node_type`. A second registration of the same
    /// type replaces the first.
    pub fn register<F>(&mut self, node_type: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn ExecutableNode> + Send + Sync + 'static,
    {
        let node_type = node_type.into();
        if self.factories.insert(node_type.clone(), Arc::new(factory)).is_some() {
            debug!("node type '{}' re-registered, previous factory replaced", node_type);
        }
    }

    /// Register a `Default`-constructible node under its own `node_type()`.
    pub fn register_node<N>(&mut self)
    where
        N: ExecutableNode + Default + 'static,
    {
        let node_type = N::default().node_type().to_owned();
        self.register(node_type, || Box::new(N::default()));
    }

    /// Register a `Default`-constructible [`TypedNode`] under its `NODE_TYPE`.
    pub fn register_typed<N>(&mut self)
    where
        N: TypedNode + Default,
    {
        self.register(N::NODE_TYPE, || Box::new(Typed(N::default())));
    }

    /// Instantiate a fresh node of `node_type`.
    ///
    /// # Errors
    /// [`EngineError::UnknownNodeType`] if nothing is registered under it.
    pub fn create(&self, node_type: &str) -> Result<Box<dyn ExecutableNode>, EngineError> {
        let factory = self
            .factories
            .get(node_type)
            .ok_or_else(|| EngineError::UnknownNodeType(node_type.to_owned()))?;
        Ok(factory())
    }

    pub fn contains(&self, node_type: &str) -> bool {
        self.factories.contains_key(node_type)
    }

    /// Registered types, sorted.
    pub fn node_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("node_types", &self.node_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodes::mock::MockNode;
    use serde_json::json;

    #[test]
    fn builtins_are_registered() {
        let registry = NodeRegistry::with_builtins();
        assert_eq!(registry.node_types(), vec!["const", "load", "passthrough", "store"]);
        assert_eq!(registry.create("store").unwrap().node_type(), "store");
    }

    #[test]
    fn unknown_type_is_named_in_the_error() {
        let registry = NodeRegistry::new();
        let err = registry.create("fee-detector").err().expect("should fail");
        assert!(matches!(&err, EngineError::UnknownNodeType(t) if t == "fee-detector"));
        assert!(err.to_string().contains("fee-detector"));
    }

    #[test]
    fn factory_runs_once_per_create() {
        let mut registry = NodeRegistry::new();
        let made = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&made);
        registry.register("probe", move || {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Box::new(MockNode::returning("probe", json!(null)))
        });

        registry.create("probe").unwrap();
        registry.create("probe").unwrap();
        assert_eq!(made.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn reregistration_last_wins() {
        let mut registry = NodeRegistry::new();
        registry.register("x", || Box::new(MockNode::returning("first", json!(1))));
        registry.register("x", || Box::new(MockNode::returning("second", json!(2))));

        assert_eq!(registry.create("x").unwrap().node_type(), "second");
        assert_eq!(registry.node_types(), vec!["x"]);
    }
}
