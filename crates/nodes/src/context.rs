//! Run-scoped state shared by every node of one pipeline execution.
//!
//! Defined here (in the nodes crate) so both the engine and individual node
//! implementations can import it without a circular dependency.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use storage::{MemoryStorage, Storage};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ResultStore
// ---------------------------------------------------------------------------

/// Append-only log of node outputs, in the order the nodes finished.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `output` for `node_id`.
    ///
    /// Recording the same id twice replaces the value but keeps its original
    /// position in the log.
    pub fn insert(&mut self, node_id: impl Into<String>, output: Value) {
        let node_id = node_id.into();
        match self.index.get(&node_id) {
            Some(&slot) => self.entries[slot].1 = output,
            None => {
                self.index.insert(node_id.clone(), self.entries.len());
                self.entries.push((node_id, output));
            }
        }
    }

    pub fn get(&self, node_id: &str) -> Option<&Value> {
        self.index.get(node_id).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.index.contains_key(node_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(node_id, output)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(id, out)| (id.as_str(), out))
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn to_map(&self) -> HashMap<String, Value> {
        self.entries.iter().cloned().collect()
    }

    /// The log as a JSON object keyed by node id.
    pub fn to_json(&self) -> Value {
        let mut out = Map::with_capacity(self.entries.len());
        for (id, output) in &self.entries {
            out.insert(id.clone(), output.clone());
        }
        Value::Object(out)
    }
}

// ---------------------------------------------------------------------------
// PipelineContext
// ---------------------------------------------------------------------------

/// Mutable state for a single run: the results log plus the caller's
/// storage handle.
///
/// Create a fresh context per run. Nodes only ever see `&PipelineContext`;
/// the executor is the sole writer of the results log.
pub struct PipelineContext {
    /// Identifies this run in logs.
    pub run_id: Uuid,
    results: ResultStore,
    storage: Arc<dyn Storage>,
}

impl PipelineContext {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            results: ResultStore::new(),
            storage,
        }
    }

    /// Context backed by a fresh, empty [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    /// Output of an already-executed node.
    pub fn result(&self, node_id: &str) -> Option<&Value> {
        self.results.get(node_id)
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// A clone of the storage handle, for callers that outlive the context.
    pub fn storage_handle(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.storage)
    }

    /// Append a node's output to the results log.
    pub fn record(&mut self, node_id: impl Into<String>, output: Value) {
        self.results.insert(node_id, output);
    }
}

impl fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineContext")
            .field("run_id", &self.run_id)
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}
