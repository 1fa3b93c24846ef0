//! Outbound HTTP to the Wikimedia APIs.
//!
//! [`Transport`] is the seam between the fetch cache and the network;
//! [`HttpTransport`] is the `reqwest` implementation. [`xml`] converts XML
//! bodies into the same value shape JSON bodies parse into.

mod http;
pub mod xml;

pub use http::HttpTransport;

use async_trait::async_trait;

/// Performs one GET request and returns the response body.
///
/// Implementations must not retry: a single failed attempt is reported as is.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<String, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Other(String),
}
