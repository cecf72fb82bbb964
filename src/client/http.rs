//! `reqwest`-backed transport bound to a base URL.

use super::{ApiResponse, Transport, TransportError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default location of the stats backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8090";

/// Transport talking to a real stats backend over HTTP.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Network(format!(
                "Request timed out after {}s",
                self.timeout.as_secs()
            ))
        } else if e.is_connect() {
            TransportError::Network(format!(
                "Cannot connect to stats server at {}",
                self.base_url
            ))
        } else {
            TransportError::Network(format!("Failed to send request: {}", e))
        }
    }

    async fn read_response(&self, response: reqwest::Response) -> Result<ApiResponse, TransportError> {
        let status = response.status();

        if !status.is_success() {
            // The status alone decides how the error is handled.
            let body = match response.text().await {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    debug!(error = %e, "Failed to read error response body");
                    String::new()
                }
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(|e| self.send_error(e))?;

        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse, TransportError> {
        let url = self.url(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        self.read_response(response).await
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ApiResponse, TransportError> {
        let url = self.url(path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        self.read_response(response).await
    }
}
