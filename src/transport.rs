use async_trait::async_trait;
use serde::Serialize;

use crate::error::TransportError;

/// Reply used when the endpoint answers without a `response` field
pub const NO_RESPONSE_REPLY: &str = "⚠️ No response from assistant.";

/// Reply recorded in the conversation when a request fails
pub const CONNECT_ERROR_REPLY: &str =
    "⚠️ Couldn't connect to the support assistant. Please try again.";

/// Request body sent to the chat endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub user_id: &'a str,
    pub message: &'a str,
}

/// Reply carried by a decoded response body.
///
/// Any JSON value is accepted; a body without a non-empty string `response`
/// field (including non-object bodies) yields the fixed fallback.
pub fn reply_from(body: &serde_json::Value) -> String {
    match body.get("response").and_then(serde_json::Value::as_str) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NO_RESPONSE_REPLY.to_string(),
    }
}

/// One request/response exchange with the chat backend
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, user_id: &str, message: &str) -> Result<String, TransportError>;
}

/// `ChatTransport` over HTTP POST with a JSON body.
///
/// Exactly one attempt per call: no retry, no timeout, and the status code
/// is not inspected.
#[derive(Clone)]
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, user_id: &str, message: &str) -> Result<String, TransportError> {
        let request = ChatRequest { user_id, message };
        tracing::debug!(endpoint = %self.endpoint, "sending chat message");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: serde_json::Value = serde_json::from_str(&body)?;
        tracing::debug!(%status, "chat reply received");

        Ok(reply_from(&parsed))
    }
}
