use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{chat, config, health, sessions};
use crate::state::AppState;

/// Main application router: health/status, the cascade entry point, and
/// the session history surface.
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/status", get(health::get_status))
        .route("/api/chat", post(chat::post_chat))
        .route("/api/config", get(config::get_config))
        .route("/api/sessions", get(sessions::list_sessions))
        .route(
            "/api/sessions/:session_id/messages",
            get(sessions::get_session_messages),
        )
        .route(
            "/api/sessions/:session_id",
            delete(sessions::delete_session),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}
