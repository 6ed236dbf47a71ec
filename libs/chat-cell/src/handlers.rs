use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use shared_database::AppState;
use shared_models::error::AppError;

use crate::models::{ChatError, ChatRequest};
use crate::services::cohere::CohereClient;

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let message = payload
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(ChatError::MessageRequired)?;

    let client = CohereClient::new(&state.config);
    let reply = client.chat(message).await?;

    Ok(Json(json!({ "reply": reply })))
}
