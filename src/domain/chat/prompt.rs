//! Prompt assembly for retrieval-augmented answers

use crate::domain::knowledge_base::RetrievedChunk;

/// Answer returned when the search finds nothing to ground the model on
pub const NO_RELEVANT_INFORMATION: &str = "No relevant information found.";

const CHUNK_SEPARATOR: &str = "\n\n";

/// Joins trimmed chunk contents in retrieval order, one blank line apart
pub fn build_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.content.trim())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "Use the following context to answer clearly and concisely.\n\n\
         Context:\n{context}\n\n\
         Question:\n{query}\n"
    )
}
