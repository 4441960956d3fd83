use std::collections::HashMap;

use async_trait::async_trait;
use bistro_llm::Message;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::checkpointer::Checkpointer;
use crate::error::{PersistError, Result};
use crate::models::ThreadInfo;

struct StoredThread {
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Process-local checkpointer. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryCheckpointer {
    threads: RwLock<HashMap<String, StoredThread>>,
}

impl InMemoryCheckpointer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_thread_id(thread_id: &str) -> Result<()> {
    if thread_id.trim().is_empty() {
        return Err(PersistError::InvalidThreadId);
    }
    Ok(())
}

#[async_trait]
impl Checkpointer for InMemoryCheckpointer {
    async fn load(&self, thread_id: &str) -> Result<Vec<Message>> {
        validate_thread_id(thread_id)?;
        let threads = self.threads.read().await;
        Ok(threads
            .get(thread_id)
            .map(|t| t.messages.clone())
            .unwrap_or_default())
    }

    async fn save(&self, thread_id: &str, messages: &[Message]) -> Result<()> {
        validate_thread_id(thread_id)?;
        let now = Utc::now();
        let mut threads = self.threads.write().await;

        match threads.get_mut(thread_id) {
            Some(thread) => {
                let stored = thread.messages.len();
                if messages.len() < stored || thread.messages[..] != messages[..stored] {
                    return Err(PersistError::NotAppendOnly {
                        thread_id: thread_id.to_string(),
                        stored,
                        attempted: messages.len(),
                    });
                }
                thread.messages.extend_from_slice(&messages[stored..]);
                thread.updated_at = now;
                tracing::debug!(thread_id, appended = messages.len() - stored, "Checkpoint updated");
            }
            None => {
                threads.insert(
                    thread_id.to_string(),
                    StoredThread {
                        messages: messages.to_vec(),
                        created_at: now,
                        updated_at: now,
                    },
                );
                tracing::debug!(thread_id, messages = messages.len(), "Checkpoint created");
            }
        }

        Ok(())
    }

    async fn list_threads(&self) -> Result<Vec<ThreadInfo>> {
        let threads = self.threads.read().await;
        let mut infos: Vec<ThreadInfo> = threads
            .iter()
            .map(|(id, t)| ThreadInfo {
                thread_id: id.clone(),
                message_count: t.messages.len(),
                created_at: t.created_at,
                updated_at: t.updated_at,
            })
            .collect();
        infos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(infos)
    }
}
