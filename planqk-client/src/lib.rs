//! PlanQK HTTP Client
//!
//! A type-safe async client for the PlanQK service platform: managed services,
//! applications and subscriptions, service jobs, data pools and application
//! jobs sent through the service gateway.
//!
//! Waiting for builds and jobs goes through one poll loop ([`poller::poll`])
//! with an injected status fetch, so every waiting operation shares the same
//! timeout and terminal-state semantics.
//!
//! # Example
//!
//! ```no_run
//! use planqk_client::{Planqk, PollConfig};
//! use planqk_core::dto::job::JobInput;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let planqk = Planqk::new("my-api-key")?;
//!
//!     let result = planqk
//!         .execute_service(
//!             "my-service",
//!             JobInput::DataUpload {
//!                 data: json!({ "values": [1, 2, 3] }),
//!                 params: json!({ "shots": 1000 }),
//!             },
//!             PollConfig::default(),
//!         )
//!         .await?;
//!
//!     println!("Result: {}", result);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod poller;
pub mod upload;

mod applications;
mod data_pools;
mod facade;
mod gateway;
mod jobs;
mod services;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use facade::Planqk;
pub use poller::{PollConfig, PollError, TerminalStates};
pub use upload::FileUpload;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Header carrying the platform API key
const AUTH_HEADER: &str = "X-Auth-Token";

/// HTTP client for the PlanQK platform API
///
/// This client provides methods for the platform endpoints, organized
/// into logical groups:
/// - Service management (create, list, publish, remove, build status)
/// - Applications and subscriptions
/// - Service jobs (trigger, status, result)
/// - Data pools (create, upload, list files)
/// - Application jobs through the service gateway
///
/// One instance holds one `reqwest::Client` and one credential set and is
/// cheap to clone.
#[derive(Clone)]
pub struct PlanqkClient {
    /// Base URL of the service platform
    base_url: String,
    /// Gateway token endpoint
    token_url: String,
    /// Platform API key
    api_key: String,
    /// HTTP client instance
    client: Client,
}

impl std::fmt::Debug for PlanqkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanqkClient")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl PlanqkClient {
    /// Create a client for the public platform
    ///
    /// # Arguments
    /// * `api_key` - Personal access token of the platform account
    ///
    /// # Example
    /// ```
    /// use planqk_client::PlanqkClient;
    ///
    /// let client = PlanqkClient::new("my-api-key").unwrap();
    /// assert_eq!(client.base_url(), "https://platform.planqk.de/qc-catalog");
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_key))
    }

    /// Create a client from a full configuration
    ///
    /// Validates the configuration and builds an HTTP client with the
    /// configured request timeout.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::with_client(config, client))
    }

    /// Create a client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc. The request
    /// timeout of `config` is not applied to `client`.
    ///
    /// # Example
    /// ```
    /// use planqk_client::{ClientConfig, PlanqkClient};
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(60))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = PlanqkClient::with_client(ClientConfig::new("my-api-key"), http_client);
    /// ```
    pub fn with_client(config: ClientConfig, client: Client) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_url: config.token_url,
            api_key: config.api_key,
            client,
        }
    }

    /// Get the base URL of the platform API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the gateway token endpoint
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    // =============================================================================
    // Request Builders
    // =============================================================================

    /// Start an authenticated request against a platform path
    fn platform(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .header(AUTH_HEADER, &self.api_key)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

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
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content (e.g., DELETE operations)
    ///
    /// This method checks the status code and returns an error if the request failed.
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
