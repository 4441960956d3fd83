use crate::node::NodeType;
use crate::types::GraphState;

/// Decides which node runs next.
pub trait Router: Send + Sync {
    fn next(&self, state: &GraphState, current: NodeType) -> NextNode;
}

#[derive(Debug, Clone, PartialEq)]
pub enum NextNode {
    Model,
    End,
}

/// START -> model -> END
pub struct SimpleRouter;

impl Router for SimpleRouter {
    fn next(&self, _state: &GraphState, current: NodeType) -> NextNode {
        match current {
            NodeType::Model => NextNode::End,
        }
    }
}
