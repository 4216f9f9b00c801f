//! Retrieval-augmented chat endpoint

use axum::extract::State;
use tracing::{error, info, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, ChatRequest, ChatResponse, Json};
use crate::domain::{ChatExchange, DomainError};

/// POST /api/chat
///
/// Missing configuration is reported before the body is looked at. Any
/// other failure, an unreadable body included, is a generic 500.
pub async fn chat(
    State(state): State<AppState>,
    request: Result<Json<ChatRequest>, ApiError>,
) -> Result<Json<ChatResponse>, ApiError> {
    match answer(&state, request).await {
        Ok(exchange) => Ok(Json(ChatResponse {
            answer: exchange.answer,
        })),
        Err(e) => {
            match &e {
                DomainError::Configuration { .. } => {
                    error!(error = %e, "Chat flow is not configured")
                }
                _ => error!(error = %e, "Chat request failed"),
            }

            Err(ApiError::from_chat_failure(e))
        }
    }
}

async fn answer(
    state: &AppState,
    request: Result<Json<ChatRequest>, ApiError>,
) -> Result<ChatExchange, DomainError> {
    match request {
        Ok(Json(request)) => {
            info!(query = %request.query, "Processing chat request");
            state.chat_service.answer(&request.query).await
        }
        Err(rejection) => {
            state.chat_service.ensure_configured()?;
            warn!(rejection = %rejection, "Unreadable chat request body");
            Err(DomainError::validation(rejection.to_string()))
        }
    }
}
