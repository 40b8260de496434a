//! ID resolver module
//!
//! Resolves job ID prefixes to full job IDs by listing the account's jobs,
//! so users can type short, unambiguous prefixes.

use anyhow::{Context, Result, anyhow};
use planqk_client::PlanqkClient;

use crate::types::IdOrPrefix;

/// Resolve a job ID or prefix to a full job ID
///
/// A full UUID is returned as given without an API call.
///
/// # Errors
/// Returns an error if:
/// - No job matches the prefix
/// - Multiple jobs match the prefix (ambiguous)
/// - API call fails
pub async fn resolve_job_id(client: &PlanqkClient, input: &str) -> Result<String> {
    let id_or_prefix = IdOrPrefix::parse(input);
    if let IdOrPrefix::Full(uuid) = &id_or_prefix {
        return Ok(uuid.to_string());
    }

    let jobs = client
        .get_all_service_jobs()
        .await
        .context("Failed to fetch jobs for ID resolution")?;

    pick_unique(jobs.iter().map(|job| job.id.as_str()), &id_or_prefix)
}

fn pick_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    id_or_prefix: &IdOrPrefix,
) -> Result<String> {
    let matches: Vec<&str> = ids.filter(|id| id_or_prefix.matches(id)).collect();

    match matches.as_slice() {
        [] => Err(anyhow!(
            "No job found with ID starting with '{}'",
            id_or_prefix
        )),
        [id] => Ok(id.to_string()),
        _ => Err(anyhow!(
            "Ambiguous prefix '{}' matches multiple jobs: {}",
            id_or_prefix,
            matches.join(", ")
        )),
    }
}
