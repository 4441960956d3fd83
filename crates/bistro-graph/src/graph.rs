use std::sync::Arc;
use std::time::Instant;

use bistro_llm::{ChatClient, Message};
use bistro_persist::Checkpointer;

use crate::error::{GraphError, Result};
use crate::node::{Node, NodeType};
use crate::nodes::ModelNode;
use crate::router::{NextNode, Router, SimpleRouter};
use crate::types::{GraphConfig, GraphInput, GraphOutput, GraphState, LLMConfig};

/// Conversation graph: START -> model -> END, checkpointed per thread.
///
/// The graph itself is stateless; every invocation loads the thread from the
/// checkpointer, runs once, and saves the extended history back.
pub struct Graph {
    model_node: ModelNode,
    router: Box<dyn Router>,
    llm_config: LLMConfig,
    checkpointer: Arc<dyn Checkpointer>,
    config: GraphConfig,
}

impl Graph {
    pub fn new(
        llm_client: Arc<dyn ChatClient>,
        llm_config: LLMConfig,
        checkpointer: Arc<dyn Checkpointer>,
        config: GraphConfig,
    ) -> Self {
        Self {
            model_node: ModelNode::new(llm_client),
            router: Box::new(SimpleRouter),
            llm_config,
            checkpointer,
            config,
        }
    }

    /// Create a builder for fluent construction
    pub fn builder() -> crate::builder::GraphBuilder {
        crate::builder::GraphBuilder::new()
    }

    pub fn checkpointer(&self) -> &Arc<dyn Checkpointer> {
        &self.checkpointer
    }

    /// Run one turn on `input.thread_id` and persist the result.
    pub async fn invoke(&self, input: GraphInput) -> Result<GraphOutput> {
        if input.thread_id.trim().is_empty() {
            return Err(GraphError::EmptyInput("thread_id"));
        }
        if input.message.trim().is_empty() {
            return Err(GraphError::EmptyInput("message"));
        }

        let start_time = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut messages = self.checkpointer.load(&input.thread_id).await?;
        let stored = messages.len();

        match input.system_prompt {
            Some(system_prompt) if messages.is_empty() => {
                messages.push(Message::system(system_prompt));
            }
            Some(_) => {
                tracing::debug!(
                    thread_id = %input.thread_id,
                    "Ignoring system prompt for a thread that already has history"
                );
            }
            None => {}
        }
        messages.push(Message::human(input.message));

        let mut state = GraphState::new(
            input.thread_id,
            run_id,
            messages,
            self.llm_config.clone(),
        );

        tracing::info!(
            run_id = %state.run_id,
            thread_id = %state.thread_id,
            stored_messages = stored,
            "Graph run started"
        );

        self.execute_loop(&mut state).await?;

        self.checkpointer
            .save(&state.thread_id, &state.messages)
            .await?;

        let reply = state
            .last_message()
            .filter(|m| m.role() == bistro_llm::Role::Assistant)
            .cloned()
            .ok_or_else(|| GraphError::MalformedResponse("run produced no reply".to_string()))?;

        tracing::info!(
            run_id = %state.run_id,
            thread_id = %state.thread_id,
            total_messages = state.messages.len(),
            duration_ms = start_time.elapsed().as_millis() as u64,
            "Graph run finished"
        );

        Ok(GraphOutput {
            thread_id: state.thread_id,
            run_id: state.run_id,
            reply,
            messages: state.messages,
        })
    }

    /// Stored history for a thread; empty when the thread is unknown.
    pub async fn history(&self, thread_id: &str) -> Result<Vec<Message>> {
        if thread_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.checkpointer.load(thread_id).await?)
    }

    async fn execute_loop(&self, state: &mut GraphState) -> Result<()> {
        let mut current_node = NodeType::Model;
        let mut iteration = 0;

        loop {
            if iteration >= self.config.max_iterations {
                return Err(GraphError::MaxIterations(self.config.max_iterations));
            }

            let node_start = Instant::now();
            match current_node {
                NodeType::Model => self.model_node.execute(state).await?,
            }
            tracing::debug!(
                run_id = %state.run_id,
                node = ?current_node,
                duration_ms = node_start.elapsed().as_millis() as u64,
                "Node finished"
            );

            match self.router.next(state, current_node) {
                NextNode::End => break,
                NextNode::Model => current_node = NodeType::Model,
            }

            iteration += 1;
        }

        Ok(())
    }
}
