//! LLM provider implementations

mod gemini;

pub use gemini::GeminiClient;
