//! Service command handlers

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Subcommand, ValueEnum};
use colored::*;
use planqk_client::{FileUpload, PlanqkClient};
use planqk_core::domain::service::{Lifecycle, Service};
use planqk_core::dto::service::ServiceConfig;

use super::PollArgs;
use crate::output::{colorize_status, print_count, report_outcome};

/// Lifecycle filter for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Stage {
    Created,
    Accessible,
    Published,
}

impl From<Stage> for Lifecycle {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Created => Lifecycle::Created,
            Stage::Accessible => Lifecycle::Accessible,
            Stage::Published => Lifecycle::Published,
        }
    }
}

/// Service subcommands
#[derive(Subcommand)]
pub enum ServiceCommands {
    /// List services
    List {
        /// Only list services in this lifecycle stage
        #[arg(long, value_enum)]
        lifecycle: Option<Stage>,
    },
    /// Show service details
    Get {
        /// Service name
        name: String,
    },
    /// Create a managed service
    Create {
        /// Service name
        name: String,

        /// Zip archive with the service code
        #[arg(long)]
        user_code: PathBuf,

        /// OpenAPI definition of the service
        #[arg(long)]
        api_definition: PathBuf,

        #[arg(long)]
        description: Option<String>,

        /// CPU share in milli CPUs
        #[arg(long, default_value_t = 1000)]
        milli_cpus: u32,

        /// Memory in megabytes
        #[arg(long, default_value_t = 4096)]
        memory: u32,

        /// Wait for the build to finish
        #[arg(long)]
        wait: bool,

        #[command(flatten)]
        poll: PollArgs,
    },
    /// Publish the service inside the organization
    Publish {
        name: String,
    },
    /// Withdraw the service from publication
    Unpublish {
        name: String,
    },
    /// Delete a service
    Remove {
        name: String,
    },
    /// Show the build status of a service
    Status {
        name: String,
    },
    /// Wait until the build of a service finished
    Wait {
        name: String,

        #[command(flatten)]
        poll: PollArgs,
    },
}

/// Handle service commands
pub async fn handle_service_command(command: ServiceCommands, client: &PlanqkClient) -> Result<()> {
    match command {
        ServiceCommands::List { lifecycle } => list_services(client, lifecycle).await,
        ServiceCommands::Get { name } => get_service(client, &name).await,
        ServiceCommands::Create {
            name,
            user_code,
            api_definition,
            description,
            milli_cpus,
            memory,
            wait,
            poll,
        } => {
            let mut config = ServiceConfig::new(name).with_resources(milli_cpus, memory);
            if let Some(description) = description {
                config = config.with_description(description);
            }
            create_service(client, config, user_code, api_definition, wait.then_some(poll)).await
        }
        ServiceCommands::Publish { name } => {
            client.publish_service_internally(&name).await?;
            println!("{} Service {} published", "✓".green(), name.cyan());
            Ok(())
        }
        ServiceCommands::Unpublish { name } => {
            client.unpublish_service(&name).await?;
            println!("{} Service {} unpublished", "✓".green(), name.cyan());
            Ok(())
        }
        ServiceCommands::Remove { name } => {
            client.remove_service(&name).await?;
            println!("{} Service {} removed", "✓".green(), name.cyan());
            Ok(())
        }
        ServiceCommands::Status { name } => build_status(client, &name).await,
        ServiceCommands::Wait { name, poll } => {
            let service = client
                .get_service(&name)
                .await?
                .ok_or_else(|| anyhow!("No service named '{}'", name))?;
            wait_for_build(client, &service, poll).await
        }
    }
}

async fn list_services(client: &PlanqkClient, lifecycle: Option<Stage>) -> Result<()> {
    let services = client.get_services(lifecycle.map(Lifecycle::from)).await?;

    if print_count(services.len(), "service") {
        for service in &services {
            print_service_summary(service);
        }
    }

    Ok(())
}

async fn get_service(client: &PlanqkClient, name: &str) -> Result<()> {
    let service = client
        .get_service(name)
        .await?
        .ok_or_else(|| anyhow!("No service named '{}'", name))?;

    print_service_details(&service);
    Ok(())
}

async fn create_service(
    client: &PlanqkClient,
    config: ServiceConfig,
    user_code: PathBuf,
    api_definition: PathBuf,
    wait: Option<PollArgs>,
) -> Result<()> {
    let user_code = FileUpload::from_path(&user_code).await?;
    let api_definition = FileUpload::from_path(&api_definition).await?;

    let service = client
        .create_managed_service(config, user_code, api_definition)
        .await?;
    println!(
        "{} Service {} created ({})",
        "✓".green(),
        service.name.cyan(),
        service.id.dimmed()
    );

    if let Some(poll) = wait {
        wait_for_build(client, &service, poll).await?;
    }

    Ok(())
}

async fn build_status(client: &PlanqkClient, name: &str) -> Result<()> {
    let service = client
        .get_service(name)
        .await?
        .ok_or_else(|| anyhow!("No service named '{}'", name))?;
    let version = service
        .current_version()
        .ok_or_else(|| anyhow!("Service '{}' has no version", name))?;

    let build = client.get_build_status(&service.id, &version.id).await?;
    println!("Build status: {}", colorize_status(&build.status));
    if let Some(message) = &build.message {
        println!("  {}", message.dimmed());
    }

    Ok(())
}

/// Wait for the build of the current version of `service`
async fn wait_for_build(client: &PlanqkClient, service: &Service, poll: PollArgs) -> Result<()> {
    let version = client.resolve_version(service).await?;

    println!("{}", format!("Waiting for build of {}...", service.name).dimmed());
    let built = client
        .wait_for_service_to_be_created(&service.id, &version.id, poll.poll_config())
        .await?;

    report_outcome(&format!("Build of service '{}'", service.name), built)
}

fn print_service_summary(service: &Service) {
    println!("  {} {}", "▸".cyan(), service.name.bold());
    println!("    ID:        {}", service.id.dimmed());
    if let Some(lifecycle) = service.lifecycle {
        println!("    Lifecycle: {}", lifecycle);
    }
    println!();
}

fn print_service_details(service: &Service) {
    println!("{}", "Service Details:".bold());
    println!("  ID:          {}", service.id.cyan());
    println!("  Name:        {}", service.name);

    if let Some(description) = &service.description {
        println!("  Description: {}", description);
    }
    if let Some(lifecycle) = service.lifecycle {
        println!("  Lifecycle:   {}", lifecycle);
    }
    if let Some(created) = &service.created_at {
        println!("  Created:     {}", created);
    }

    if !service.service_definitions.is_empty() {
        println!("\n{}", "Versions:".bold());
        for definition in &service.service_definitions {
            println!(
                "  {} {}",
                definition.id.cyan(),
                definition.version.as_deref().unwrap_or("-")
            );
            if let Some(endpoint) = &definition.gateway_endpoint {
                println!("    Gateway: {}", endpoint.dimmed());
            }
        }
    }
}
