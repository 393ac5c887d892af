//! Bridge error types

use thiserror::Error;

/// Bridge error type
#[derive(Error, Debug)]
pub enum BridgeError {
    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed relay frame
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Connection attempt timed out
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Webhook delivery failure
    #[error("Delivery error: {0}")]
    Delivery(#[from] reqwest::Error),
}

/// Bridge result type
pub type Result<T> = std::result::Result<T, BridgeError>;
