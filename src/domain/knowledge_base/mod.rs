//! Knowledge base domain - Upstream knowledge service contract

mod client;
mod retrieval;
mod upload;

pub use client::KnowledgeBaseClient;
pub use retrieval::{DEFAULT_TOP_K, RetrievalQuery, RetrievalResponse, RetrievedChunk};
pub use upload::{DEFAULT_KNOWLEDGE_BASE_NAME, KnowledgeBaseUpload, UploadedFile};

#[cfg(test)]
pub use client::MockKnowledgeBaseClient;
