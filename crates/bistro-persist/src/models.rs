use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a stored conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadInfo {
    pub thread_id: String,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
