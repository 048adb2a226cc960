use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::validation::validate_chat_message;
use super::{ApiError, AppState, ChatRequest, ChatResponse};

/// `POST /chat`
///
/// Blank messages are rejected here, before any provider call.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    let message = validate_chat_message(request.message.as_deref())?;

    let reply = state.assistant().chat(message).await?;
    Ok(Json(ChatResponse { reply }))
}
