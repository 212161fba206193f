//! Pipeline execution over a node graph.
//!
//! A run resolves its sources (merging them when the graph has a Merge node),
//! applies the first Trim node, then the first Effect node, and hands the
//! result back for the Output node.

mod executor;
mod state;

pub(crate) use executor::decode;
pub use executor::{PipelineExecutor, PipelineOutput};
pub use state::PipelineState;
