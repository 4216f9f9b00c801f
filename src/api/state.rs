//! Application state shared by the handlers

use std::sync::Arc;

use crate::domain::KnowledgeBaseClient;
use crate::infrastructure::services::ChatService;

/// Immutable after startup; every field is cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub knowledge_base: Arc<dyn KnowledgeBaseClient>,
    pub chat_service: Arc<ChatService>,
}

impl AppState {
    pub fn new(knowledge_base: Arc<dyn KnowledgeBaseClient>, chat_service: Arc<ChatService>) -> Self {
        Self {
            knowledge_base,
            chat_service,
        }
    }
}
