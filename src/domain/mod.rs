//! Domain layer - Request-scoped types and upstream contracts

pub mod chat;
pub mod error;
pub mod knowledge_base;
pub mod llm;

pub use chat::ChatExchange;
pub use error::DomainError;
pub use knowledge_base::{KnowledgeBaseClient, KnowledgeBaseUpload, RetrievalQuery, RetrievedChunk};
pub use llm::GenerationClient;
