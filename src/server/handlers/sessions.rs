use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::history::{HistoryMessage, SessionInfo};
use crate::state::AppState;

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SessionInfo>>, ApiError> {
    Ok(Json(state.history.list_sessions().await?))
}

pub async fn get_session_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<HistoryMessage>>, ApiError> {
    Ok(Json(state.history.get_messages(&session_id).await?))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.history.delete_session(&session_id).await? {
        return Err(ApiError::NotFound(format!("session {}", session_id)));
    }
    Ok(Json(json!({ "deleted": session_id })))
}
