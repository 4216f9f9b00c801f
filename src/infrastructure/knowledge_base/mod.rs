//! Knowledge base service clients

mod context_api;

pub use context_api::ContextApiClient;
