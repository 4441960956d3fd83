use bistro_llm::Message;

use crate::error::Result;
use crate::graph::Graph;
use crate::types::GraphInput;

/// Memory-backed chat assistant over a conversation graph.
pub struct ChatAssistant {
    graph: Graph,
}

impl ChatAssistant {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    /// Send `message` on `thread_id` and return the assistant's reply.
    ///
    /// `system_prompt` only takes effect on the first turn of a thread.
    pub async fn chat(
        &self,
        message: &str,
        thread_id: &str,
        system_prompt: Option<&str>,
    ) -> Result<String> {
        let mut input = GraphInput::new(thread_id, message);
        if let Some(system_prompt) = system_prompt {
            input = input.with_system_prompt(system_prompt);
        }
        let output = self.graph.invoke(input).await?;
        Ok(output.reply_text().to_string())
    }

    pub async fn history(&self, thread_id: &str) -> Result<Vec<Message>> {
        self.graph.history(thread_id).await
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}
