//! `engine` crate — pipeline data model, DAG ordering, input merging, the
//! node registry, and the executor.

pub mod dag;
pub mod error;
pub mod merge;
pub mod models;
pub mod registry;
pub mod executor;

pub use dag::{topological_order, validate_pipeline};
pub use error::EngineError;
pub use executor::{ExecutorConfig, PipelineExecutor, PipelineResult};
pub use merge::merge_inputs;
pub use models::{Edge, Pipeline, PipelineNode};
pub use registry::{NodeFactory, NodeRegistry};

pub use nodes::{ExecutableNode, NodeError, PipelineContext};
