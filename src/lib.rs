//! Knowledge Proxy
//!
//! Relays a frontend to an external knowledge base service and answers chat
//! questions by retrieval-augmented generation:
//! - Knowledge base listing, creation and status checks passed through verbatim
//! - Chat answers grounded on the top matching chunks of a configured knowledge base

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::DomainError;
use infrastructure::knowledge_base::ContextApiClient;
use infrastructure::llm::GeminiClient;
use infrastructure::services::ChatService;
use tracing::{info, warn};

/// Wires the upstream clients and the chat service from configuration
pub fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    let knowledge_base = Arc::new(ContextApiClient::from_config(
        &config.upstream,
        &config.credentials,
    )?);
    let generation = Arc::new(GeminiClient::from_config(
        &config.upstream,
        &config.credentials,
    )?);

    let chat_service = ChatService::new(
        knowledge_base.clone(),
        generation,
        config.credentials.clone(),
        config.upstream.model.clone(),
    );

    let missing = chat_service.missing_configuration();
    if missing.is_empty() {
        info!(model = %config.upstream.model, "Chat flow configured");
    } else {
        warn!(missing = ?missing, "Chat requests will fail until configuration is provided");
    }

    Ok(AppState::new(knowledge_base, Arc::new(chat_service)))
}
