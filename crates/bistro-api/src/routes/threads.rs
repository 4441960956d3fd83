use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use bistro_persist::ThreadInfo;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateThreadResponse {
    pub thread_id: String,
}

/// Allocate a new conversation id
///
/// Nothing is stored until the first message is sent on the thread.
pub async fn create_thread() -> (StatusCode, Json<CreateThreadResponse>) {
    let thread_id = Uuid::new_v4().to_string();
    tracing::debug!(thread_id = %thread_id, "Allocated thread id");

    (StatusCode::CREATED, Json(CreateThreadResponse { thread_id }))
}

/// List stored threads, most recently updated first
pub async fn list_threads(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ThreadInfo>>> {
    let threads = state.checkpointer().list_threads().await?;
    Ok(Json(threads))
}
