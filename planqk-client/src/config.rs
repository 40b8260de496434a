//! Client configuration
//!
//! Credentials and endpoints for the service platform, the data pool
//! catalog and the gateway token endpoint.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Base URL of the service platform API
pub const DEFAULT_BASE_URL: &str = "https://platform.planqk.de/qc-catalog";

/// OAuth2 token endpoint of the service gateway
pub const DEFAULT_TOKEN_URL: &str = "https://gateway.platform.planqk.de/token";

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// Personal access token, sent as `X-Auth-Token`
    pub api_key: String,

    /// Service platform base URL (services, applications, jobs, data pools)
    pub base_url: String,

    /// Token endpoint used for application jobs
    pub token_url: String,

    /// Timeout applied to every single HTTP request
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Creates a new configuration with defaults
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PLANQK_API_KEY (required)
    /// - PLANQK_BASE_URL (optional)
    /// - PLANQK_TOKEN_URL (optional)
    /// - PLANQK_REQUEST_TIMEOUT (optional, seconds, default: 30)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("PLANQK_API_KEY")
            .map_err(|_| ClientError::Config("PLANQK_API_KEY environment variable not set".into()))?;

        let mut config = Self::new(api_key);

        if let Ok(base_url) = std::env::var("PLANQK_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(token_url) = std::env::var("PLANQK_TOKEN_URL") {
            config.token_url = token_url;
        }

        if let Some(timeout) = std::env::var("PLANQK_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(timeout);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ClientError::Config("api_key cannot be empty".into()));
        }

        for (name, url) in [("base_url", &self.base_url), ("token_url", &self.token_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClientError::Config(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(ClientError::Config(
                "request_timeout must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
