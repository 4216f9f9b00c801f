use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::domain::llm::DEFAULT_GENERATION_MODEL;

const DEFAULT_KNOWLEDGE_BASE_URL: &str = "https://backend.vgvishesh.com";
const DEFAULT_GENERATION_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub upstream: UpstreamConfig,
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Upstream endpoints and timeouts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub knowledge_base_url: String,
    pub generation_url: String,
    /// Per-request timeout of the knowledge base listing call
    pub list_timeout_secs: u64,
    /// Client-wide timeout applied to every other upstream call
    pub request_timeout_secs: u64,
    pub model: String,
}

/// Secrets and identifiers. All optional at startup; the chat flow requires them.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub api_key: Option<String>,
    pub knowledge_base_id: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            knowledge_base_url: DEFAULT_KNOWLEDGE_BASE_URL.to_string(),
            generation_url: DEFAULT_GENERATION_URL.to_string(),
            list_timeout_secs: 8,
            request_timeout_secs: 120,
            model: DEFAULT_GENERATION_MODEL.to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl CredentialsConfig {
    /// Confirms every required value is set and returns the knowledge base id.
    /// The upstream clients carry their own keys; this only gates the chat flow.
    pub fn resolve_knowledge_base_id(&self) -> Result<String, DomainError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(DomainError::configuration(format!(
                "Missing required configuration: {}",
                missing.join(", ")
            )));
        }

        present(&self.knowledge_base_id).ok_or_else(|| {
            DomainError::configuration("Missing required configuration: KNOWLEDGE_BASE_ID")
        })
    }

    /// Names of the required variables that are unset or blank
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("API_KEY", &self.api_key),
            ("KNOWLEDGE_BASE_ID", &self.knowledge_base_id),
            ("GEMINI_API_KEY", &self.gemini_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// Secrets never reach the logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("knowledge_base_id", &self.knowledge_base_id)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl AppConfig {
    /// Loads configuration from files, `APP__*` variables and the flat
    /// `API_KEY`, `KNOWLEDGE_BASE_ID`, `GEMINI_API_KEY` and `PORT` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("credentials.api_key", std::env::var("API_KEY").ok())?
            .set_override_option(
                "credentials.knowledge_base_id",
                std::env::var("KNOWLEDGE_BASE_ID").ok(),
            )?
            .set_override_option(
                "credentials.gemini_api_key",
                std::env::var("GEMINI_API_KEY").ok(),
            )?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        config.try_deserialize()
    }
}
