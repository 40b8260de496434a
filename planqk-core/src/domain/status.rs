//! Remote resource status
//!
//! Build status and job status share one vocabulary on the platform, except
//! that builds report `SUCCESS` while jobs report `SUCCEEDED`.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Status reported by the platform for a build or a job
///
/// Parsing is an exact, case-sensitive match on the wire value. Anything the
/// SDK does not know is kept verbatim in [`Status::Other`] and is never terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Pending,
    Running,
    /// Job finished successfully
    Succeeded,
    /// Build finished successfully
    Success,
    Failed,
    Cancelled,
    Other(String),
}

impl Status {
    /// Wire representation of the status
    pub fn as_str(&self) -> &str {
        match self {
            Status::Pending => "PENDING",
            Status::Running => "RUNNING",
            Status::Succeeded => "SUCCEEDED",
            Status::Success => "SUCCESS",
            Status::Failed => "FAILED",
            Status::Cancelled => "CANCELLED",
            Status::Other(raw) => raw,
        }
    }

    /// Parse a wire value; unknown values become [`Status::Other`]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PENDING" => Status::Pending,
            "RUNNING" => Status::Running,
            "SUCCEEDED" => Status::Succeeded,
            "SUCCESS" => Status::Success,
            "FAILED" => Status::Failed,
            "CANCELLED" => Status::Cancelled,
            other => Status::Other(other.to_string()),
        }
    }

    /// Whether the remote resource will no longer change on its own
    pub fn is_terminal(&self) -> bool {
        self.is_success() || self.is_failure()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Succeeded | Status::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed | Status::Cancelled)
    }
}

impl FromStr for Status {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Status::parse(s))
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match Status::parse(&raw) {
            Status::Other(_) => Status::Other(raw),
            known => known,
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
