//! Error types for the PlanQK client

use thiserror::Error;

use crate::poller::PollError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the PlanQK client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Waiting for a remote resource exceeded its timeout
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Service build ended in a failure state
    #[error("Service build failed: {0}")]
    ServiceBuildFailed(String),

    /// Job ended in a failure state
    #[error("Job failed: {0}")]
    JobFailed(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_)) || matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}

impl From<PollError<ClientError>> for ClientError {
    fn from(e: PollError<ClientError>) -> Self {
        match e {
            PollError::Fetch(inner) => inner,
            PollError::Timeout { .. } => Self::Timeout(e.to_string()),
            PollError::InvalidConfig(msg) => Self::Config(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_predicates() {
        assert!(ClientError::api_error(404, "gone").is_not_found());
        assert!(ClientError::NotFound("svc".into()).is_not_found());
        assert!(ClientError::api_error(401, "nope").is_client_error());
        assert!(!ClientError::api_error(401, "nope").is_server_error());
        assert!(ClientError::api_error(503, "down").is_server_error());
    }

    #[test]
    fn test_poll_fetch_error_is_unwrapped() {
        let err: ClientError = PollError::Fetch(ClientError::api_error(500, "boom")).into();
        assert!(matches!(err, ClientError::ApiError { status: 500, .. }));
    }

    #[test]
    fn test_poll_timeout_maps_to_timeout() {
        let err: ClientError = PollError::<ClientError>::Timeout {
            description: "job job-1".into(),
            timeout: Duration::from_secs(5),
        }
        .into();
        assert!(err.is_timeout());
        assert!(err.to_string().contains("job job-1"));
    }
}
