//! HTTP transport used to talk to the stats backend.
//!
//! The setup and stats components only depend on the [`Transport`] trait,
//! so they can be driven by the real [`HttpTransport`] or by a scripted
//! transport in tests.

pub mod http;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use http::HttpTransport;

/// A successful (2xx) response from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body. Non-JSON bodies are kept as a string value.
    pub body: Value,
}

#[cfg(test)]
impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }
}

/// Failure of a single request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The server answered, but with a non-success status.
    #[error("server responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// No response was received at all.
    #[error("{0}")]
    Network(String),
}

impl TransportError {
    /// Status code of the response carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network(_) => None,
        }
    }

    /// A 400 from the setup endpoint means the job already exists or is in
    /// progress. It is never surfaced to the caller.
    pub fn is_benign_conflict(&self) -> bool {
        self.status() == Some(400)
    }
}

/// The two request shapes the backend exposes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body to `path`.
    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, TransportError>;

    /// GET `path` with the given query parameters.
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse, TransportError>;
}
