use async_trait::async_trait;
use bistro_llm::Message;

use crate::error::Result;
use crate::models::ThreadInfo;

/// Storage for the full message list of each conversation thread.
///
/// Histories are append-only: `save` receives the complete list after a turn,
/// and that list must extend whatever was stored before.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Full history for a thread; empty when the thread is unknown.
    async fn load(&self, thread_id: &str) -> Result<Vec<Message>>;

    /// Replace the stored history with `messages`, creating the thread if needed.
    async fn save(&self, thread_id: &str, messages: &[Message]) -> Result<()>;

    /// Threads ordered by most recent update first.
    async fn list_threads(&self) -> Result<Vec<ThreadInfo>>;
}
