use async_trait::async_trait;

use crate::error::Result;
use crate::types::GraphState;

/// A unit of computation in the graph
#[async_trait]
pub trait Node: Send + Sync {
    /// Run the node, mutating the shared state in place.
    async fn execute(&self, state: &mut GraphState) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Model,
}
