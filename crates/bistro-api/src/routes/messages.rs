use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use bistro_llm::Message;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
    /// Only applied on the first turn of a thread
    #[serde(default)]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub thread_id: String,
    pub reply: String,
}

/// Send a message and wait for the assistant's reply
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let reply = state
        .assistant
        .chat(&req.message, &thread_id, req.system_prompt.as_deref())
        .await?;

    Ok(Json(SendMessageResponse { thread_id, reply }))
}

/// Full ordered history of a thread; empty for an unknown id
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<Vec<Message>>> {
    let messages = state.assistant.history(&thread_id).await?;
    Ok(Json(messages))
}
