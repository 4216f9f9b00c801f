//! Request and response types of the relay API

pub mod chat;
pub mod error;
pub mod json;

pub use chat::{ChatRequest, ChatResponse};
pub use error::{ApiError, INTERNAL_SERVER_ERROR, SERVER_MISCONFIGURATION};
pub use json::Json;
