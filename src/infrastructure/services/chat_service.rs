//! Chat service - Retrieval-augmented answering over the configured knowledge base

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CredentialsConfig;
use crate::domain::chat::{NO_RELEVANT_INFORMATION, build_context, build_prompt};
use crate::domain::{ChatExchange, DomainError, GenerationClient, KnowledgeBaseClient, RetrievalQuery};

const CHUNK_PREVIEW_CHARS: usize = 80;

/// Answers questions by retrieving context, then asking the model.
///
/// The two upstream calls run in sequence. When generation fails after a
/// successful retrieval nothing needs undoing; no state is kept either way.
pub struct ChatService {
    knowledge_base: Arc<dyn KnowledgeBaseClient>,
    generation: Arc<dyn GenerationClient>,
    credentials: CredentialsConfig,
    model: String,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("credentials", &self.credentials)
            .field("model", &self.model)
            .finish()
    }
}

impl ChatService {
    pub fn new(
        knowledge_base: Arc<dyn KnowledgeBaseClient>,
        generation: Arc<dyn GenerationClient>,
        credentials: CredentialsConfig,
        model: impl Into<String>,
    ) -> Self {
        Self {
            knowledge_base,
            generation,
            credentials,
            model: model.into(),
        }
    }

    /// Names of required settings the chat flow cannot run without
    pub fn missing_configuration(&self) -> Vec<&'static str> {
        self.credentials.missing()
    }

    /// Fails with a configuration error when any required setting is missing
    pub fn ensure_configured(&self) -> Result<(), DomainError> {
        self.credentials.resolve_knowledge_base_id().map(|_| ())
    }

    pub async fn answer(&self, query: &str) -> Result<ChatExchange, DomainError> {
        // Checked before any network call
        let knowledge_base_id = self.credentials.resolve_knowledge_base_id()?;

        debug!(query = %query, "Retrieving context");
        let retrieval = RetrievalQuery::new(knowledge_base_id, query);
        let chunks = self.knowledge_base.retrieve(&retrieval).await?;

        info!(chunks = chunks.len(), "Context retrieved");

        if chunks.is_empty() {
            return Ok(ChatExchange::new(query, NO_RELEVANT_INFORMATION));
        }

        for (index, chunk) in chunks.iter().enumerate() {
            debug!(
                chunk = index + 1,
                preview = %preview(&chunk.content),
                "Context chunk"
            );
        }

        let context = build_context(&chunks);
        let prompt = build_prompt(&context, query);

        debug!(model = %self.model, "Requesting answer");
        let answer = self.generation.generate(&self.model, &prompt).await?;
        info!(answer_chars = answer.len(), "Answer generated");

        Ok(ChatExchange::new(query, answer))
    }
}

fn preview(content: &str) -> String {
    content.chars().take(CHUNK_PREVIEW_CHARS).collect()
}
