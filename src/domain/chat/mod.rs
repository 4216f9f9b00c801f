//! Chat domain - Retrieval-augmented question answering

mod prompt;

pub use prompt::{NO_RELEVANT_INFORMATION, build_context, build_prompt};

/// A single question and its answer; nothing is kept once the response is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub query: String,
    pub answer: String,
}

impl ChatExchange {
    pub fn new(query: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            answer: answer.into(),
        }
    }
}
