//! Relay error responses

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::domain::DomainError;

pub const SERVER_MISCONFIGURATION: &str = "Server misconfiguration.";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// API error with status code and the JSON body sent to the caller
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiError {
    /// Error with a `{ "error": message }` body
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    /// Error carrying an arbitrary body, used to relay upstream responses
    pub fn with_body(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Chat route mapping: configuration problems are reported as such,
    /// everything else collapses into one generic message
    pub fn from_chat_failure(err: DomainError) -> Self {
        match err {
            DomainError::Configuration { .. } => Self::internal(SERVER_MISCONFIGURATION),
            _ => Self::internal(INTERNAL_SERVER_ERROR),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Relay mapping: upstream status and body pass through, anything else is a 500
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();

        match err {
            DomainError::Upstream { status, body } => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

                match body {
                    Some(body) => Self::with_body(status, body),
                    None => Self::new(status, message),
                }
            }
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Transport { .. }
            | DomainError::InvalidResponse { .. }
            | DomainError::Configuration { .. } => Self::internal(message),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.body)
    }
}

impl std::error::Error for ApiError {}
