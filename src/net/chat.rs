//! Chat service client.
//!
//! Thin HTTP wrapper for `POST {base}/chat`. Pure parsing in
//! `parse_response` for testability.

use url::Url;

use super::types::{ChatRequest, ChatResponse};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by chat service calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("chat request failed: {0}")]
    Request(String),

    /// The service answered with a non-success HTTP status.
    #[error("chat service error: status {status}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("chat response parse failed: {0}")]
    Parse(String),
}

// =============================================================================
// SERVICE TRAIT
// =============================================================================

/// The remote chat/answer capability. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatService: Send + Sync {
    /// Send `prompt` to `endpoint`, authorised by `bearer` when present.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] if the request fails, the service rejects it,
    /// or the body is not a chat response.
    async fn chat(&self, endpoint: &Url, bearer: Option<&str>, prompt: &str) -> Result<ChatResponse, ChatError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// [`ChatService`] backed by `reqwest`. No timeout and no retry: a request
/// either completes or fails at the transport.
pub struct HttpChatService {
    http: reqwest::Client,
}

impl HttpChatService {
    /// # Errors
    ///
    /// Returns [`ChatError::HttpClientBuild`] if the TLS backend fails to load.
    pub fn new() -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ChatError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl ChatService for HttpChatService {
    async fn chat(&self, endpoint: &Url, bearer: Option<&str>, prompt: &str) -> Result<ChatResponse, ChatError> {
        let mut request = self
            .http
            .post(endpoint.as_str())
            .json(&ChatRequest { user_prompt: prompt });
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ChatError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ChatError::Status { status: status.as_u16(), body: text });
        }

        let parsed = parse_response(&text)?;
        tracing::debug!(
            session_id = %parsed.session_id,
            references = parsed.references.len(),
            "chat response received"
        );
        Ok(parsed)
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<ChatResponse, ChatError> {
    serde_json::from_str(json).map_err(|e| ChatError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
