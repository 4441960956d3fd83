use std::sync::Arc;

use async_trait::async_trait;
use bistro_llm::{ChatClient, ChatRequest, Message};

use crate::error::{GraphError, Result};
use crate::node::Node;
use crate::types::GraphState;

/// Sends the accumulated history to the model and appends the single reply.
pub struct ModelNode {
    client: Arc<dyn ChatClient>,
}

impl ModelNode {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Node for ModelNode {
    async fn execute(&self, state: &mut GraphState) -> Result<()> {
        let request = ChatRequest::new(state.llm_config.model.clone(), state.messages.clone())
            .with_options(state.llm_config.chat_options());

        tracing::debug!(
            run_id = %state.run_id,
            thread_id = %state.thread_id,
            history = state.messages.len(),
            "MODEL_NODE: calling model"
        );

        let response = self.client.chat(request).await?;
        let text = response.text().trim();
        if text.is_empty() {
            return Err(GraphError::MalformedResponse(
                "model returned an empty reply".to_string(),
            ));
        }

        state.add_message(Message::ai(text));
        Ok(())
    }
}
