//! Completion poller
//!
//! Waits for a remote build or job to reach a terminal status by calling an
//! injected fetch function on a fixed interval. The three waiting operations
//! of the client (service build, service job, application job) only differ
//! in the fetch function and the terminal set they pass in.

use std::future::Future;
use std::time::Duration;

use planqk_core::domain::status::Status;
use thiserror::Error;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

/// Default time to wait for a terminal status
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(500);

/// Default delay between two status requests
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Timing of a poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Give up once this much time has elapsed without a terminal status
    pub timeout: Duration,

    /// Delay between two status requests
    pub interval: Duration,
}

impl PollConfig {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.interval.is_zero() {
            return Err("poll interval must be greater than 0".to_string());
        }
        if self.timeout.is_zero() {
            return Err("poll timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Set of statuses that end a poll loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalStates {
    success: Vec<Status>,
    failure: Vec<Status>,
}

/// Outcome of matching one status against a [`TerminalStates`] set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Success,
    Failure,
}

impl TerminalStates {
    pub fn new(success: Vec<Status>, failure: Vec<Status>) -> Self {
        Self { success, failure }
    }

    /// Service builds report `SUCCESS`
    pub fn build() -> Self {
        Self::new(
            vec![Status::Success],
            vec![Status::Failed, Status::Cancelled],
        )
    }

    /// Service and application jobs report `SUCCEEDED`
    pub fn job() -> Self {
        Self::new(
            vec![Status::Succeeded],
            vec![Status::Failed, Status::Cancelled],
        )
    }

    /// Exact membership test; `None` means keep waiting
    pub fn classify(&self, status: &Status) -> Option<Terminal> {
        if self.success.contains(status) {
            Some(Terminal::Success)
        } else if self.failure.contains(status) {
            Some(Terminal::Failure)
        } else {
            None
        }
    }
}

/// Errors of a poll loop
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// No terminal status within the configured timeout
    #[error("timed out after {timeout:?} waiting for {description}")]
    Timeout {
        description: String,
        timeout: Duration,
    },

    #[error("invalid poll configuration: {0}")]
    InvalidConfig(String),

    /// The fetch function failed; the loop does not retry
    #[error(transparent)]
    Fetch(E),
}

/// Poll `fetch_status` until it returns a terminal status
///
/// The first status is fetched right away, so an already finished resource
/// returns without sleeping. After that the loop sleeps `interval`, checks the
/// elapsed time against `timeout` and fetches again.
///
/// # Returns
/// * `Ok(true)` - a success status was reached
/// * `Ok(false)` - a failure status was reached
/// * `Err(PollError::Timeout)` - no terminal status within `timeout`
/// * `Err(PollError::Fetch)` - the fetch function returned an error
pub async fn poll<F, Fut, E>(
    description: &str,
    mut fetch_status: F,
    terminal: &TerminalStates,
    config: &PollConfig,
) -> Result<bool, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Status, E>>,
{
    config.validate().map_err(PollError::InvalidConfig)?;
    if config.interval >= config.timeout {
        warn!(
            "Poll interval {:?} is not shorter than timeout {:?}; {} gets at most one recheck",
            config.interval, config.timeout, description
        );
    }

    let start = Instant::now();
    let mut status = fetch_status().await.map_err(PollError::Fetch)?;

    loop {
        match terminal.classify(&status) {
            Some(Terminal::Success) => {
                debug!("{} finished with status {}", description, status);
                return Ok(true);
            }
            Some(Terminal::Failure) => {
                warn!("{} finished with status {}", description, status);
                return Ok(false);
            }
            None => {}
        }

        time::sleep(config.interval).await;

        let elapsed = start.elapsed();
        if elapsed > config.timeout {
            warn!(
                "Timeout after {:?} waiting for {} (last status: {})",
                config.timeout, description, status
            );
            return Err(PollError::Timeout {
                description: description.to_string(),
                timeout: config.timeout,
            });
        }

        debug!(
            "{}|{} Waiting for {} ({})",
            elapsed.as_secs(),
            config.timeout.as_secs(),
            description,
            status
        );

        status = fetch_status().await.map_err(PollError::Fetch)?;
    }
}
