//! QJob HTTP Client
//!
//! A type-safe HTTP client for the QJob orchestrator API, plus the
//! wait-for-completion polling protocol.
//!
//! # Example
//!
//! ```no_run
//! use qjob_client::{OrchestratorClient, poller};
//! use qjob_core::dto::job::SubmitRequest;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OrchestratorClient::new("http://localhost:5002");
//!
//!     let accepted = client
//!         .submit(&SubmitRequest {
//!             payload: "AQ==".to_string(),
//!             shots: 1024,
//!             target_name: "aer-simulator".to_string(),
//!             job_id: None,
//!             resources: None,
//!         })
//!         .await?;
//!
//!     let result = poller::await_result(
//!         &client,
//!         accepted.job_id.as_str(),
//!         Duration::from_secs(5),
//!         Duration::from_secs(600),
//!     )
//!     .await?;
//!
//!     println!("got {} result bytes", result.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
pub mod poller;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use poller::{AwaitError, JobHandle, JobStatusApi};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the QJob orchestrator API
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    /// Base URL of the orchestrator (e.g., "http://localhost:5002")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl OrchestratorClient {
    /// Create a new orchestrator client
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a client with a custom HTTP client, for configuring timeouts,
    /// proxies or TLS
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the orchestrator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::NotFound(error_text));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {e}")))
    }

    /// Handle an API response that returns no content
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OrchestratorClient::new("http://localhost:5002");
        assert_eq!(client.base_url(), "http://localhost:5002");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = OrchestratorClient::new("http://localhost:5002/");
        assert_eq!(client.base_url(), "http://localhost:5002");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = OrchestratorClient::with_client("http://localhost:5002", http_client);
        assert_eq!(client.base_url(), "http://localhost:5002");
    }
}
