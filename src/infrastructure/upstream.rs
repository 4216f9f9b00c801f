//! Shared plumbing for upstream HTTP calls

use std::time::Duration;

use serde_json::Value;

use crate::domain::DomainError;

/// Builds a pooled client with a client-wide timeout
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, DomainError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DomainError::transport(format!("Failed to build HTTP client: {}", e)))
}

/// Maps a failure below the HTTP layer (connect, DNS, timeout)
pub fn transport_error(err: reqwest::Error) -> DomainError {
    if err.is_timeout() {
        DomainError::transport(format!("Upstream request timed out: {}", err))
    } else {
        DomainError::transport(err.to_string())
    }
}

/// Reads an upstream response as JSON.
///
/// Non-2xx responses become `DomainError::Upstream` carrying the status and
/// whatever body came back. A 2xx body that is not JSON is kept as a string,
/// and an empty one becomes the empty string.
pub async fn read_json(response: reqwest::Response) -> Result<Value, DomainError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(DomainError::upstream(status.as_u16(), parse_body(&bytes)));
    }

    Ok(parse_body(&bytes).unwrap_or_else(|| Value::String(String::new())))
}

fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    serde_json::from_slice(bytes)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(bytes).into_owned())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_body() {
        assert_eq!(
            parse_body(br#"{"detail":"not found"}"#),
            Some(serde_json::json!({"detail": "not found"}))
        );
    }

    #[test]
    fn test_parse_text_body() {
        assert_eq!(
            parse_body(b"Bad Gateway"),
            Some(Value::String("Bad Gateway".to_string()))
        );
    }

    #[tokio::test]
    async fn test_read_json_empty_success_body() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let response = reqwest::get(server.uri()).await.unwrap();
        assert_eq!(read_json(response).await.unwrap(), Value::String(String::new()));
    }

    #[tokio::test]
    async fn test_client_wide_timeout() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = build_client(Duration::from_millis(100)).unwrap();
        let err = client.get(server.uri()).send().await.map_err(transport_error).unwrap_err();

        assert!(matches!(err, DomainError::Transport { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_parse_empty_body() {
        assert_eq!(parse_body(b""), None);
        assert_eq!(parse_body(b"  \n"), None);
    }
}
