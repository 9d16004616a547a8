//! `nodes` crate — the `ExecutableNode` contract, the per-run context, and
//! the generic built-in nodes.
//!
//! Every node — built-in and domain-specific alike — must implement
//! [`ExecutableNode`], either directly or through the [`TypedNode`] adapter.
//! The engine crate dispatches execution through this trait object.

pub mod builtin;
pub mod context;
pub mod error;
pub mod mock;
pub mod traits;
pub mod typed;

pub use context::{PipelineContext, ResultStore};
pub use error::NodeError;
pub use traits::ExecutableNode;
pub use typed::{Typed, TypedNode};
