use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

/// Non-secret view of the recognized configuration surface.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, ApiError> {
    let faq = state.config.faq_settings();
    let search = state.config.search_settings();
    let models = state.config.model_settings();

    Ok(Json(json!({
        "faq": {
            "distance_threshold": faq.distance_threshold,
        },
        "search": {
            "enabled": search.serper_api_key.is_some(),
            "context_phrase": search.context_phrase,
            "trusted_domains": search.trusted_domains,
            "result_limit": search.result_limit,
        },
        "models": {
            "chat_model": models.chat_model,
            "embedding_model": models.embedding_model,
        },
    })))
}
