//! Configuration module
//!
//! Handles CLI configuration: credentials and platform endpoints.

use std::time::Duration;

use anyhow::{Context, Result};
use planqk_client::{ClientConfig, PlanqkClient};

/// CLI configuration
#[derive(Clone)]
pub struct Config {
    /// Platform API key
    pub api_key: String,
    /// Platform API base URL
    pub base_url: String,
    /// Gateway token endpoint
    pub token_url: String,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
}

impl Config {
    /// Build an API client for this configuration
    pub fn client(&self) -> Result<PlanqkClient> {
        let config = ClientConfig::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_token_url(self.token_url.clone())
            .with_request_timeout(Duration::from_secs(self.request_timeout));

        PlanqkClient::from_config(config).context("Invalid client configuration")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use httpmock::MockServer;

    /// CLI client pointed at a mock server
    pub fn test_client(server: &MockServer) -> PlanqkClient {
        let config = Config {
            api_key: "test-key".into(),
            base_url: server.base_url(),
            token_url: server.url("/token"),
            request_timeout: 5,
        };
        config.client().unwrap()
    }
}
