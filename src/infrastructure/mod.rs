//! Infrastructure layer - Upstream clients, services and logging

pub mod knowledge_base;
pub mod llm;
pub mod logging;
pub mod services;
pub mod upstream;
