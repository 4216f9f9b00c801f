use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

use crate::config::{CredentialsConfig, UpstreamConfig};
use crate::domain::knowledge_base::{
    KnowledgeBaseClient, KnowledgeBaseUpload, RetrievalQuery, RetrievalResponse, RetrievedChunk,
};
use crate::domain::DomainError;
use crate::infrastructure::upstream::{build_client, read_json, transport_error};

const API_KEY_HEADER: &str = "x-api-key";
const COLLECTION: &str = "knowledgebase";
const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(8);

/// Context API knowledge base client
#[derive(Debug, Clone)]
pub struct ContextApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    list_timeout: Duration,
}

impl ContextApiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            api_key,
            list_timeout: DEFAULT_LIST_TIMEOUT,
        }
    }

    pub fn from_config(
        upstream: &UpstreamConfig,
        credentials: &CredentialsConfig,
    ) -> Result<Self, DomainError> {
        let client = build_client(upstream.request_timeout())?;

        Ok(Self::new(
            client,
            upstream.knowledge_base_url.clone(),
            credentials.api_key.clone(),
        )
        .with_list_timeout(upstream.list_timeout()))
    }

    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    /// Builds `{base}/knowledgebase/{segments..}` with each segment percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url, DomainError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            DomainError::configuration(format!("Invalid knowledge base URL: {}", e))
        })?;

        url.path_segments_mut()
            .map_err(|_| DomainError::configuration("Knowledge base URL cannot be a base"))?
            .pop_if_empty()
            .push(COLLECTION)
            .extend(segments);

        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }
}

/// Assembles the creation form: `name`, optional `description`, one `files` part per file
fn build_form(upload: KnowledgeBaseUpload) -> Result<Form, DomainError> {
    let mut form = Form::new().text("name", upload.name);

    if let Some(description) = upload.description {
        form = form.text("description", description);
    }

    for file in upload.files {
        let part = Part::stream(file.data)
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| {
                DomainError::validation(format!(
                    "Invalid content type for '{}': {}",
                    file.file_name, e
                ))
            })?;

        form = form.part("files", part);
    }

    Ok(form)
}

#[async_trait]
impl KnowledgeBaseClient for ContextApiClient {
    async fn list_knowledge_bases(&self) -> Result<Value, DomainError> {
        let url = self.url(&[])?;
        debug!(url = %url, "Listing knowledge bases");

        let response = self
            .authorize(self.client.get(url))
            .timeout(self.list_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn create_knowledge_base(
        &self,
        upload: KnowledgeBaseUpload,
    ) -> Result<Value, DomainError> {
        let url = self.url(&[])?;
        debug!(
            url = %url,
            name = %upload.name,
            files = upload.files.len(),
            "Creating knowledge base"
        );

        let form = build_form(upload)?;
        let response = self
            .authorize(self.client.post(url))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn creation_status(&self, request_id: &str) -> Result<Value, DomainError> {
        let url = self.url(&[request_id])?;
        debug!(url = %url, "Checking knowledge base creation status");

        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn retrieve(&self, query: &RetrievalQuery) -> Result<Vec<RetrievedChunk>, DomainError> {
        let url = self.url(&[query.knowledge_base_id.as_str(), "embeddings"])?;
        debug!(url = %url, top_k = query.top_k, "Retrieving relevant chunks");

        let response = self
            .authorize(self.client.post(url))
            .json(query)
            .send()
            .await
            .map_err(transport_error)?;

        let body = match read_json(response).await? {
            Value::Null => return Ok(Vec::new()),
            Value::String(text) if text.is_empty() => return Ok(Vec::new()),
            body => body,
        };

        let parsed: RetrievalResponse = serde_json::from_value(body).map_err(|e| {
            DomainError::invalid_response(format!("Failed to parse retrieval response: {}", e))
        })?;

        Ok(parsed.into_chunks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_base::UploadedFile;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ContextApiClient {
        ContextApiClient::new(
            reqwest::Client::new(),
            server.uri(),
            Some("test-api-key".to_string()),
        )
    }

    #[tokio::test]
    async fn test_list_knowledge_bases() {
        let server = MockServer::start().await;
        let body = serde_json::json!([{"id": "kb-1", "name": "Docs"}]);

        Mock::given(method("GET"))
            .and(path("/knowledgebase"))
            .and(header("x-api-key", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).list_knowledge_bases().await.unwrap();
        assert_eq!(result, body);
    }

    #[tokio::test]
    async fn test_list_relays_upstream_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/knowledgebase"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).list_knowledge_bases().await.unwrap_err();

        match err {
            DomainError::Upstream { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, Some(serde_json::json!({"detail": "not found"})));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/knowledgebase"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).with_list_timeout(Duration::from_millis(100));
        let err = client.list_knowledge_bases().await.unwrap_err();

        assert!(matches!(err, DomainError::Transport { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    fn slow_client_for(server: &MockServer) -> ContextApiClient {
        ContextApiClient::new(
            build_client(Duration::from_millis(100)).unwrap(),
            server.uri(),
            Some("test-api-key".to_string()),
        )
    }

    async fn mount_slow(server: &MockServer, verb: &str, route: &str) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(server)
            .await;
    }

    fn assert_timed_out(err: DomainError) {
        assert!(matches!(err, DomainError::Transport { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_client_timeout_applies_to_create_status_and_retrieve() {
        let server = MockServer::start().await;
        mount_slow(&server, "POST", "/knowledgebase").await;
        mount_slow(&server, "GET", "/knowledgebase/req-1").await;
        mount_slow(&server, "POST", "/knowledgebase/kb-1/embeddings").await;

        let client = slow_client_for(&server);

        assert_timed_out(
            client
                .create_knowledge_base(KnowledgeBaseUpload::new(None))
                .await
                .unwrap_err(),
        );
        assert_timed_out(client.creation_status("req-1").await.unwrap_err());
        assert_timed_out(
            client
                .retrieve(&RetrievalQuery::new("kb-1", "anything"))
                .await
                .unwrap_err(),
        );
    }

    #[tokio::test]
    async fn test_list_timeout_overrides_client_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/knowledgebase"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let client = slow_client_for(&server).with_list_timeout(Duration::from_secs(5));
        let result = client.list_knowledge_bases().await.unwrap();

        assert_eq!(result, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = ContextApiClient::new(reqwest::Client::new(), "http://127.0.0.1:1", None);

        let err = client.list_knowledge_bases().await.unwrap_err();
        assert!(matches!(err, DomainError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_missing_api_key_omits_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/knowledgebase"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let client = ContextApiClient::new(reqwest::Client::new(), server.uri(), None);
        client.list_knowledge_bases().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("x-api-key"));
    }

    #[tokio::test]
    async fn test_create_without_files_sends_only_text_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/knowledgebase"))
            .and(header("x-api-key", "test-api-key"))
            .respond_with(
                ResponseTemplate::new(202).set_body_json(serde_json::json!({"requestId": "req-1"})),
            )
            .mount(&server)
            .await;

        let upload = KnowledgeBaseUpload::new(None).with_description("Course notes");
        let result = client_for(&server).create_knowledge_base(upload).await.unwrap();
        assert_eq!(result["requestId"], "req-1");

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0].headers["content-type"].to_str().unwrap().to_string();
        let body = String::from_utf8_lossy(&requests[0].body).to_string();

        assert!(content_type.starts_with("multipart/form-data"));
        assert!(body.contains("name=\"name\""));
        assert!(body.contains("New Knowledge Base"));
        assert!(body.contains("name=\"description\""));
        assert!(body.contains("Course notes"));
        assert!(!body.contains("name=\"files\""));
    }

    #[tokio::test]
    async fn test_create_attaches_files() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/knowledgebase"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"requestId": "req-2"})),
            )
            .mount(&server)
            .await;

        let upload = KnowledgeBaseUpload::new(Some("Physics".to_string()))
            .with_file(UploadedFile::new("notes.txt", "text/plain", &b"F = ma"[..]));

        client_for(&server).create_knowledge_base(upload).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body).to_string();

        assert!(body.contains("Physics"));
        assert!(!body.contains("name=\"description\""));
        assert!(body.contains("name=\"files\"; filename=\"notes.txt\""));
        assert!(body.contains("Content-Type: text/plain"));
        assert!(body.contains("F = ma"));
    }

    #[tokio::test]
    async fn test_creation_status() {
        let server = MockServer::start().await;
        let status = serde_json::json!({"status": "processing", "progress": 40});

        Mock::given(method("GET"))
            .and(path("/knowledgebase/req-42"))
            .and(header("x-api-key", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status.clone()))
            .mount(&server)
            .await;

        let result = client_for(&server).creation_status("req-42").await.unwrap();
        assert_eq!(result, status);
    }

    #[tokio::test]
    async fn test_creation_status_encodes_identifier() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/knowledgebase/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).creation_status("a/b").await.unwrap();
    }

    #[tokio::test]
    async fn test_retrieve_returns_chunks_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/knowledgebase/kb-1/embeddings"))
            .and(header("x-api-key", "test-api-key"))
            .and(body_json(serde_json::json!({
                "knowledgeBaseId": "kb-1",
                "query": "What is X?",
                "topK": 5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "embeddings": [
                    {"content": "A is X.", "score": 0.9},
                    {"content": "B is Y.", "score": 0.5}
                ]
            })))
            .mount(&server)
            .await;

        let chunks = client_for(&server)
            .retrieve(&RetrievalQuery::new("kb-1", "What is X?"))
            .await
            .unwrap();

        assert_eq!(
            chunks,
            vec![RetrievedChunk::new("A is X."), RetrievedChunk::new("B is Y.")]
        );
    }

    #[tokio::test]
    async fn test_retrieve_with_empty_body_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/knowledgebase/kb-1/embeddings"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let chunks = client_for(&server)
            .retrieve(&RetrievalQuery::new("kb-1", "anything"))
            .await
            .unwrap();

        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_without_embeddings_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/knowledgebase/kb-1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let chunks = client_for(&server)
            .retrieve(&RetrievalQuery::new("kb-1", "anything"))
            .await
            .unwrap();

        assert!(chunks.is_empty());
    }
}
