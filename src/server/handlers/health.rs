use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "index_entries": state.index_size,
        "search_enabled": state.search_enabled,
    }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let total_messages = state.history.message_count().await.unwrap_or(0);
    Ok(Json(json!({
        "index_entries": state.index_size,
        "search_enabled": state.search_enabled,
        "total_messages": total_messages,
    })))
}
