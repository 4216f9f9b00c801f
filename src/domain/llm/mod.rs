//! LLM domain - Text generation contract

mod generation;

pub use generation::{DEFAULT_GENERATION_MODEL, GenerationClient};

#[cfg(test)]
pub use generation::MockGenerationClient;
