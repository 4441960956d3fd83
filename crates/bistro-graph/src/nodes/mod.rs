pub mod model_node;

pub use model_node::ModelNode;
