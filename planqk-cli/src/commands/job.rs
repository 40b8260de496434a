//! Job command handlers
//!
//! Handles all service-job CLI commands: listing, details, status and
//! result lookups, starting jobs and waiting for them.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Subcommand;
use colored::*;
use planqk_client::PlanqkClient;
use planqk_core::domain::job::Job;
use planqk_core::dto::job::JobInput;
use serde_json::Value;

use super::PollArgs;
use crate::id_resolver::resolve_job_id;
use crate::output::{colorize_status, print_count, print_json, report_outcome};

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List service jobs
    List {
        /// Only list jobs of the current version of this service
        #[arg(long)]
        service: Option<String>,
    },
    /// Get job details
    Get {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Get the status of a job
    Status {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Get the result of a finished job
    Result {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Start a job on a service and wait for it
    Run {
        /// Service name
        service: String,

        /// Input data as inline JSON
        #[arg(long, conflicts_with_all = ["data_file", "pool"])]
        data: Option<String>,

        /// Input data read from a JSON file
        #[arg(long, conflicts_with = "pool")]
        data_file: Option<PathBuf>,

        /// Read the input from this data pool instead of uploading it
        #[arg(long, requires = "file")]
        pool: Option<String>,

        /// File inside the data pool
        #[arg(long, requires = "pool")]
        file: Option<String>,

        /// Parameters as inline JSON
        #[arg(long, default_value = "{}")]
        params: String,

        #[command(flatten)]
        poll: PollArgs,
    },
    /// Delete a job
    Remove {
        /// Job ID or unambiguous prefix
        id: String,
    },
    /// Wait until a job finished
    Wait {
        /// Job ID or unambiguous prefix
        id: String,

        #[command(flatten)]
        poll: PollArgs,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
pub async fn handle_job_command(command: JobCommands, client: &PlanqkClient) -> Result<()> {
    match command {
        JobCommands::List { service } => list_jobs(client, service.as_deref()).await,
        JobCommands::Get { id } => {
            let id = resolve_job_id(client, &id).await?;
            let job = client.get_service_job(&id).await?;
            print_job_details(&job);
            Ok(())
        }
        JobCommands::Status { id } => {
            let id = resolve_job_id(client, &id).await?;
            let status = client.get_service_job_status(&id).await?;
            println!("{}", colorize_status(&status));
            Ok(())
        }
        JobCommands::Result { id } => {
            let id = resolve_job_id(client, &id).await?;
            let result = client.get_service_job_result(&id).await?;
            print_json(&result);
            Ok(())
        }
        JobCommands::Run {
            service,
            data,
            data_file,
            pool,
            file,
            params,
            poll,
        } => {
            let params = parse_json(&params, "--params")?;
            let input = match (pool, file) {
                (Some(pool), Some(file)) => pool_input(client, &pool, &file, params).await?,
                _ => JobInput::DataUpload {
                    data: read_data(data, data_file).await?,
                    params,
                },
            };
            run_job(client, &service, input, poll).await
        }
        JobCommands::Remove { id } => {
            let id = resolve_job_id(client, &id).await?;
            client.remove_service_job(&id).await?;
            println!("{} Job {} removed", "✓".green(), id.dimmed());
            Ok(())
        }
        JobCommands::Wait { id, poll } => {
            let id = resolve_job_id(client, &id).await?;
            wait_for_job(client, &id, poll).await
        }
    }
}

async fn list_jobs(client: &PlanqkClient, service: Option<&str>) -> Result<()> {
    let jobs = match service {
        Some(name) => client.get_service_jobs(name).await?,
        None => client.get_all_service_jobs().await?,
    };

    if print_count(jobs.len(), "job") {
        for job in &jobs {
            print_job_summary(job);
        }
    }

    Ok(())
}

async fn wait_for_job(client: &PlanqkClient, id: &str, poll: PollArgs) -> Result<()> {
    println!("{}", format!("Waiting for job {}...", id).dimmed());
    let succeeded = client
        .wait_for_service_job_to_be_finished(id, poll.poll_config())
        .await?;
    report_outcome(&format!("Job {}", id), succeeded)
}

async fn run_job(client: &PlanqkClient, service: &str, input: JobInput, poll: PollArgs) -> Result<()> {
    println!("{}", format!("Running job on {}...", service).dimmed());

    let job = client
        .trigger_service_job(service, input, poll.poll_config())
        .await?;
    print_job_details(&job);

    if !job.status.is_success() {
        return Err(anyhow!("Job {} ended with status {}", job.id, job.status));
    }

    if let Some(result) = job.decoded_result() {
        println!("\n{}", "Result:".bold());
        print_json(&result.context("Job result is not valid JSON")?);
    }

    Ok(())
}

async fn pool_input(
    client: &PlanqkClient,
    pool: &str,
    file: &str,
    params: Value,
) -> Result<JobInput> {
    let files = client.get_data_pool_file_information(pool).await?;
    let info = files
        .get(file)
        .ok_or_else(|| anyhow!("No file '{}' in data pool '{}'", file, pool))?;

    Ok(JobInput::DataPool {
        data_ref: info.to_ref(),
        params,
    })
}

async fn read_data(inline: Option<String>, path: Option<PathBuf>) -> Result<Value> {
    match (inline, path) {
        (Some(raw), _) => parse_json(&raw, "--data"),
        (None, Some(path)) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_json(&raw, &path.display().to_string())
        }
        (None, None) => Ok(Value::Object(Default::default())),
    }
}

fn parse_json(raw: &str, source: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("Invalid JSON in {}", source))
}

/// Print a job summary
fn print_job_summary(job: &Job) {
    println!("  {} Job {}", "▸".cyan(), job.id.dimmed());
    println!("    Status:   {}", colorize_status(&job.status));
    if let Some(definition) = job.service_definition_id() {
        println!("    Service:  {}", definition.dimmed());
    }
    if let Some(created) = &job.created_at {
        println!("    Created:  {}", created.dimmed());
    }
    println!();
}

/// Print detailed job information
fn print_job_details(job: &Job) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.id.cyan());
    println!("  Status:      {}", colorize_status(&job.status));

    if let Some(definition) = job.service_definition_id() {
        println!("  Definition:  {}", definition.dimmed());
    }
    if let Some(created) = &job.created_at {
        println!("  Created:     {}", created);
    }
    if let Some(started) = &job.started_at {
        println!("  Started:     {}", started);
    }
    if let Some(ended) = &job.ended_at {
        println!("  Ended:       {}", ended);
    }
    if let Some(duration) = job.duration() {
        println!("  Duration:    {}s", duration.num_seconds());
    }
}
