pub mod assistant;
pub mod builder;
pub mod error;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod router;
pub mod types;

pub use assistant::ChatAssistant;
pub use builder::GraphBuilder;
pub use error::GraphError;
pub use graph::Graph;
pub use node::{Node, NodeType};
pub use nodes::ModelNode;
pub use router::{NextNode, Router, SimpleRouter};
pub use types::{GraphConfig, GraphInput, GraphOutput, GraphState, LLMConfig};
