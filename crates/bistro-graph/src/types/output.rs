use bistro_llm::Message;

/// Result of a single graph invocation.
#[derive(Debug, Clone)]
pub struct GraphOutput {
    pub thread_id: String,
    pub run_id: String,
    /// The assistant message produced by this run
    pub reply: Message,
    /// Full thread history after this run
    pub messages: Vec<Message>,
}

impl GraphOutput {
    pub fn reply_text(&self) -> &str {
        self.reply.text()
    }
}
