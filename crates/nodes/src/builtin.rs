//! Generic built-in nodes.
//!
//! Domain nodes (price extraction, fee detection, ...) live with the
//! front-ends that build pipelines. These are the plumbing nodes every
//! pipeline can use.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use storage::Storage;
use tracing::debug;

use crate::{ExecutableNode, NodeError, PipelineContext, TypedNode};

pub const CONST: &str = "const";
pub const PASSTHROUGH: &str = "passthrough";
pub const STORE: &str = "store";
pub const LOAD: &str = "load";

// ---------------------------------------------------------------------------
// const
// ---------------------------------------------------------------------------

/// Emits its config unchanged. Typical source node.
#[derive(Debug, Default)]
pub struct ConstNode;

#[async_trait]
impl ExecutableNode for ConstNode {
    fn node_type(&self) -> &str {
        CONST
    }

    async fn execute(
        &self,
        _input: Value,
        config: &Value,
        _ctx: &PipelineContext,
    ) -> Result<Value, NodeError> {
        Ok(config.clone())
    }
}

// ---------------------------------------------------------------------------
// passthrough
// ---------------------------------------------------------------------------

/// Emits its merged input unchanged.
#[derive(Debug, Default)]
pub struct PassthroughNode;

#[async_trait]
impl ExecutableNode for PassthroughNode {
    fn node_type(&self) -> &str {
        PASSTHROUGH
    }

    async fn execute(
        &self,
        input: Value,
        _config: &Value,
        _ctx: &PipelineContext,
    ) -> Result<Value, NodeError> {
        Ok(input)
    }
}

// ---------------------------------------------------------------------------
// store
// ---------------------------------------------------------------------------

/// Writes its input to storage under `config.key` and passes it on.
#[derive(Debug, Default)]
pub struct StoreNode;

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    pub key: String,
}

#[async_trait]
impl TypedNode for StoreNode {
    const NODE_TYPE: &'static str = STORE;
    type Config = StoreConfig;
    type Input = Value;
    type Output = Value;

    async fn run(
        &self,
        input: Value,
        config: StoreConfig,
        ctx: &PipelineContext,
    ) -> Result<Value, NodeError> {
        debug!(run_id = %ctx.run_id, "storing input under '{}'", config.key);
        ctx.storage().put(&config.key, input.clone()).await?;
        Ok(input)
    }
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

/// Reads `config.key` from storage and emits it as `{ field: value }`.
///
/// `field` defaults to the key. A missing key yields `null`.
#[derive(Debug, Default)]
pub struct LoadNode;

#[derive(Debug, Deserialize)]
pub struct LoadConfig {
    pub key: String,
    #[serde(default)]
    pub field: Option<String>,
}

#[async_trait]
impl TypedNode for LoadNode {
    const NODE_TYPE: &'static str = LOAD;
    type Config = LoadConfig;
    type Input = Value;
    type Output = Map<String, Value>;

    async fn run(
        &self,
        _input: Value,
        config: LoadConfig,
        ctx: &PipelineContext,
    ) -> Result<Map<String, Value>, NodeError> {
        let value = ctx.storage().get(&config.key).await?.unwrap_or(Value::Null);
        let field = config.field.unwrap_or(config.key);

        let mut out = Map::new();
        out.insert(field, value);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Typed;
    use serde_json::json;

    #[tokio::test]
    async fn const_emits_config() {
        let ctx = PipelineContext::in_memory();
        let out = ConstNode
            .execute(json!({ "ignored": true }), &json!({ "value": 5 }), &ctx)
            .await
            .unwrap();
        assert_eq!(out, json!({ "value": 5 }));
    }

    #[tokio::test]
    async fn passthrough_emits_input() {
        let ctx = PipelineContext::in_memory();
        let out = PassthroughNode
            .execute(json!({ "a": 1 }), &json!({ "b": 2 }), &ctx)
            .await
            .unwrap();
        assert_eq!(out, json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn store_then_load_share_the_storage_handle() {
        let ctx = PipelineContext::in_memory();

        let stored = Typed(StoreNode)
            .execute(json!({ "total": 42 }), &json!({ "key": "cart" }), &ctx)
            .await
            .unwrap();
        assert_eq!(stored, json!({ "total": 42 }));

        let loaded = Typed(LoadNode)
            .execute(json!({}), &json!({ "key": "cart", "field": "previous" }), &ctx)
            .await
            .unwrap();
        assert_eq!(loaded, json!({ "previous": { "total": 42 } }));
    }

    #[tokio::test]
    async fn load_of_missing_key_is_null() {
        let ctx = PipelineContext::in_memory();
        let loaded = Typed(LoadNode)
            .execute(json!({}), &json!({ "key": "absent" }), &ctx)
            .await
            .unwrap();
        assert_eq!(loaded, json!({ "absent": null }));
    }

    #[tokio::test]
    async fn store_without_key_is_a_config_error() {
        let ctx = PipelineContext::in_memory();
        let err = Typed(StoreNode)
            .execute(json!({}), &Value::Null, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::InvalidConfig { .. }));
    }
}
