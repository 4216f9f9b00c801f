use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::chat;
use super::health;
use super::knowledge_bases;
use super::middleware::logging_middleware;
use super::state::AppState;

/// Create the relay router.
///
/// `max_upload_bytes` bounds inbound bodies, multipart uploads included.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Relay API consumed by the frontend
        .nest("/api", create_api_router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/knowledgebase",
            get(knowledge_bases::list_knowledge_bases).post(knowledge_bases::create_knowledge_base),
        )
        .route(
            "/knowledgebase/{request_id}",
            get(knowledge_bases::get_creation_status),
        )
        .route("/chat", post(chat::chat))
}
