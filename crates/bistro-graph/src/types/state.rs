use bistro_llm::Message;
use serde::{Deserialize, Serialize};

use crate::types::config::LLMConfig;

#[derive(Debug, Clone)]
pub struct GraphState {
    pub thread_id: String,
    pub run_id: String,
    pub messages: Vec<Message>,
    pub llm_config: LLMConfig,
}

impl GraphState {
    pub fn new(
        thread_id: String,
        run_id: String,
        messages: Vec<Message>,
        llm_config: LLMConfig,
    ) -> Self {
        Self {
            thread_id,
            run_id,
            messages,
            llm_config,
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// One user turn addressed to a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphInput {
    pub thread_id: String,
    pub message: String,
    /// Only used when the thread has no history yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl GraphInput {
    pub fn new(thread_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            message: message.into(),
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}
