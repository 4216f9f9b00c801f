//! Knowledge base creation payload

use bytes::Bytes;

/// Name used when the caller does not provide one
pub const DEFAULT_KNOWLEDGE_BASE_NAME: &str = "New Knowledge Base";

/// A file received from the caller, forwarded as-is
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// Request to create a knowledge base from uploaded documents
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBaseUpload {
    pub name: String,
    pub description: Option<String>,
    pub files: Vec<UploadedFile>,
}

impl KnowledgeBaseUpload {
    /// Create an upload; a missing or blank name falls back to the default
    pub fn new(name: Option<String>) -> Self {
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_KNOWLEDGE_BASE_NAME.to_string());

        Self {
            name,
            description: None,
            files: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();

        if !description.is_empty() {
            self.description = Some(description);
        }
        self
    }

    pub fn with_file(mut self, file: UploadedFile) -> Self {
        self.files.push(file);
        self
    }
}
