use thiserror::Error;

/// Failure of a single chat request
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to chat endpoint failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat endpoint returned a body that is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
