//! Structured node authoring.
//!
//! Most nodes know the exact shape of their config, input and output. A
//! [`TypedNode`] declares those shapes as serde types and the [`Typed`]
//! adapter does the JSON conversion at the edge of the graph, where field
//! names are only known at pipeline-construction time.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{ExecutableNode, NodeError, PipelineContext};

#[async_trait]
pub trait TypedNode: Send + Sync + 'static {
    /// Registry key for this node.
    const NODE_TYPE: &'static str;

    type Config: DeserializeOwned + Send;
    type Input: DeserializeOwned + Send;
    type Output: Serialize + Send;

    async fn run(
        &self,
        input: Self::Input,
        config: Self::Config,
        ctx: &PipelineContext,
    ) -> Result<Self::Output, NodeError>;
}

/// Wraps a [`TypedNode`] so it can be registered as an [`ExecutableNode`].
#[derive(Debug, Default, Clone)]
pub struct Typed<N>(pub N);

impl<N> Typed<N> {
    pub fn new(node: N) -> Self {
        Self(node)
    }
}

#[async_trait]
impl<N: TypedNode> ExecutableNode for Typed<N> {
    fn node_type(&self) -> &str {
        N::NODE_TYPE
    }

    async fn execute(
        &self,
        input: Value,
        config: &Value,
        ctx: &PipelineContext,
    ) -> Result<Value, NodeError> {
        let config: N::Config = decode(config.clone()).map_err(|e| NodeError::InvalidConfig {
            message: format!("{}: {e}", N::NODE_TYPE),
        })?;
        let input: N::Input = decode(input).map_err(|e| NodeError::InvalidInput {
            message: format!("{}: {e}", N::NODE_TYPE),
        })?;

        let output = self.0.run(input, config, ctx).await?;

        serde_json::to_value(output)
            .map_err(|e| NodeError::failed(format!("{}: unserialisable output: {e}", N::NODE_TYPE)))
    }
}

/// A missing (`null`) config or input decodes as an empty object, so
/// all-optional structs need no explicit `{}`.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    match value {
        Value::Null => serde_json::from_value(Value::Object(Map::new())),
        other => serde_json::from_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Default)]
    struct Discount;

    #[derive(Deserialize)]
    struct DiscountConfig {
        #[serde(default = "default_rate")]
        rate: f64,
    }

    fn default_rate() -> f64 {
        0.1
    }

    #[derive(Deserialize)]
    struct DiscountInput {
        price: f64,
    }

    #[derive(Serialize)]
    struct DiscountOutput {
        price: f64,
    }

    #[async_trait]
    impl TypedNode for Discount {
        const NODE_TYPE: &'static str = "discount";
        type Config = DiscountConfig;
        type Input = DiscountInput;
        type Output = DiscountOutput;

        async fn run(
            &self,
            input: DiscountInput,
            config: DiscountConfig,
            _ctx: &PipelineContext,
        ) -> Result<DiscountOutput, NodeError> {
            Ok(DiscountOutput { price: input.price * (1.0 - config.rate) })
        }
    }

    #[tokio::test]
    async fn typed_node_round_trips_through_json() {
        let node = Typed(Discount);
        let ctx = PipelineContext::in_memory();

        assert_eq!(node.node_type(), "discount");

        let out = node
            .execute(json!({ "price": 200.0 }), &json!({ "rate": 0.25 }), &ctx)
            .await
            .unwrap();
        assert_eq!(out, json!({ "price": 150.0 }));
    }

    #[tokio::test]
    async fn null_config_uses_serde_defaults() {
        let ctx = PipelineContext::in_memory();
        let out = Typed(Discount)
            .execute(json!({ "price": 100.0 }), &Value::Null, &ctx)
            .await
            .unwrap();
        assert_eq!(out, json!({ "price": 90.0 }));
    }

    #[tokio::test]
    async fn missing_input_field_is_reported() {
        let ctx = PipelineContext::in_memory();
        let err = Typed(Discount)
            .execute(json!({ "cost": 1 }), &Value::Null, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::InvalidInput { message } if message.contains("price")));
    }

    #[tokio::test]
    async fn malformed_config_is_reported() {
        let ctx = PipelineContext::in_memory();
        let err = Typed(Discount)
            .execute(json!({ "price": 1.0 }), &json!({ "rate": "lots" }), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::InvalidConfig { .. }));
    }
}
