use axum::{Json, extract::State};
use tracing::debug;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if payload.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    let reply = state
        .chat
        .reply(&payload.message)
        .await
        .map_err(AppError::Chat)?;

    // Only answered turns are kept; failed calls never reach the history.
    let entry = state.history.record(payload.message, reply.clone()).await;
    debug!(date = %entry.date, id = %entry.id, "chat turn recorded");

    Ok(Json(ChatResponse { reply }))
}
