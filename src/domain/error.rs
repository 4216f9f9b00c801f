use serde_json::Value;
use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// The upstream answered with a non-2xx status. `body` is `None` when the
    /// upstream sent nothing usable back.
    #[error("Upstream responded with HTTP {status}")]
    Upstream { status: u16, body: Option<Value> },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Invalid upstream response: {message}")]
    InvalidResponse { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn upstream(status: u16, body: Option<Value>) -> Self {
        Self::Upstream { status, body }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error() {
        let error = DomainError::upstream(404, Some(serde_json::json!({"detail": "not found"})));
        assert_eq!(error.to_string(), "Upstream responded with HTTP 404");
    }

    #[test]
    fn test_transport_error() {
        let error = DomainError::transport("connection refused");
        assert_eq!(error.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("API_KEY is not set");
        assert_eq!(error.to_string(), "Configuration error: API_KEY is not set");
    }
}
