//! Knowledge base service port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use super::retrieval::{RetrievalQuery, RetrievedChunk};
use super::upload::KnowledgeBaseUpload;
use crate::domain::error::DomainError;

/// Client for the external knowledge base service.
///
/// Listing, creation and status calls return the upstream JSON untouched so the
/// relay can hand it back to the caller verbatim.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KnowledgeBaseClient: Send + Sync {
    /// Lists the knowledge bases visible to the configured credential
    async fn list_knowledge_bases(&self) -> Result<Value, DomainError>;

    /// Uploads documents to create a new knowledge base; processing is asynchronous
    async fn create_knowledge_base(&self, upload: KnowledgeBaseUpload)
        -> Result<Value, DomainError>;

    /// Returns the processing status of a creation request
    async fn creation_status(&self, request_id: &str) -> Result<Value, DomainError>;

    /// Runs a similarity search, returning chunks in upstream relevance order
    async fn retrieve(&self, query: &RetrievalQuery) -> Result<Vec<RetrievedChunk>, DomainError>;
}
