//! Knowledge base relay endpoints

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use serde_json::Value;
use tracing::{debug, error};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::DomainError;
use crate::domain::knowledge_base::{KnowledgeBaseUpload, UploadedFile};

const DEFAULT_FILE_NAME: &str = "upload";

/// GET /api/knowledgebase
pub async fn list_knowledge_bases(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .knowledge_base
        .list_knowledge_bases()
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, "Error listing knowledge bases");
            ApiError::from(e)
        })
}

/// POST /api/knowledgebase
/// Multipart form: `name`, optional `description`, zero or more `files`
pub async fn create_knowledge_base(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        ApiError::new(rejection.status(), rejection.body_text())
    })?;

    let upload = read_upload(multipart).await.map_err(|e| {
        error!(error = %e, "Error reading knowledge base upload");
        ApiError::from(e)
    })?;

    state
        .knowledge_base
        .create_knowledge_base(upload)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, "Error creating knowledge base");
            ApiError::from(e)
        })
}

/// GET /api/knowledgebase/{request_id}
pub async fn get_creation_status(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .knowledge_base
        .creation_status(&request_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(error = %e, request_id = %request_id, "Error checking creation status");
            ApiError::from(e)
        })
}

async fn read_upload(mut multipart: Multipart) -> Result<KnowledgeBaseUpload, DomainError> {
    let mut name = None;
    let mut description = None;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::validation(format!("Failed to read multipart field: {}", e)))?
    {
        let field_name = field.name().map(str::to_string);

        match field_name.as_deref() {
            Some("name") => name = Some(read_text(field).await?),
            Some("description") => description = Some(read_text(field).await?),
            Some("files") => files.push(read_file(field).await?),
            other => debug!(field = ?other, "Ignoring unknown multipart field"),
        }
    }

    let mut upload = KnowledgeBaseUpload::new(name);

    if let Some(description) = description {
        upload = upload.with_description(description);
    }

    Ok(files.into_iter().fold(upload, KnowledgeBaseUpload::with_file))
}

async fn read_text(field: Field<'_>) -> Result<String, DomainError> {
    field
        .text()
        .await
        .map_err(|e| DomainError::validation(format!("Failed to read text field: {}", e)))
}

async fn read_file(field: Field<'_>) -> Result<UploadedFile, DomainError> {
    let file_name = field
        .file_name()
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string();

    let content_type = field
        .content_type()
        .map(str::to_string)
        .unwrap_or_else(|| guess_content_type(&file_name));

    let data = field.bytes().await.map_err(|e| {
        DomainError::validation(format!("Failed to read file '{}': {}", file_name, e))
    })?;

    Ok(UploadedFile::new(file_name, content_type, data))
}

fn guess_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
