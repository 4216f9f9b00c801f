use serde::{Deserialize, Serialize};

/// Number of chunks requested from the similarity search
pub const DEFAULT_TOP_K: u32 = 5;

/// Similarity search request, serialized as the upstream expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalQuery {
    pub knowledge_base_id: String,
    pub query: String,
    pub top_k: u32,
}

impl RetrievalQuery {
    pub fn new(knowledge_base_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            knowledge_base_id: knowledge_base_id.into(),
            query: query.into(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// One relevance-ranked passage returned by the search
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrievedChunk {
    pub content: String,
}

impl RetrievedChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Search response body; extra fields on each embedding are ignored
#[derive(Debug, Default, Deserialize)]
pub struct RetrievalResponse {
    #[serde(default)]
    pub embeddings: Option<Vec<RetrievedChunk>>,
}

impl RetrievalResponse {
    /// Chunks in upstream order; a missing or null list means no matches
    pub fn into_chunks(self) -> Vec<RetrievedChunk> {
        self.embeddings.unwrap_or_default()
    }
}
