use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answer::AnswerResult;
use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    pub question: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub answer: AnswerResult,
}

/// The cascade entry point. Empty or whitespace-only questions are
/// rejected here, upstream of the resolver.
pub async fn post_chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatResponse>, ApiError> {
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest(
            "question must not be empty".to_string(),
        ));
    }

    let session_id = payload
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let answer = state.cascade.answer(question).await;

    // History is best-effort: a persistence failure must not discard an
    // answer the cascade already produced.
    if let Err(err) = state
        .history
        .append_message(&session_id, "user", question, None)
        .await
    {
        tracing::warn!("failed to persist user message: {}", err);
    }
    if let Err(err) = state
        .history
        .append_message(&session_id, "assistant", &answer.content, Some(answer.source))
        .await
    {
        tracing::warn!("failed to persist assistant message: {}", err);
    }

    Ok(Json(ChatResponse { session_id, answer }))
}
