use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Model used for chat answers unless configured otherwise
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash";

/// Trait for language-model text generation.
///
/// One prompt in, one completed text out. No streaming and no conversation state.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, DomainError>;
}
