//! PlanQK CLI
//!
//! Command-line interface for managing services, applications, jobs and
//! data pools on the PlanQK platform.

mod commands;
mod config;
mod id_resolver;
mod output;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "planqk")]
#[command(about = "PlanQK platform CLI", long_about = None)]
struct Cli {
    /// Personal access token of the platform account
    #[arg(long, env = "PLANQK_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Platform API base URL
    #[arg(
        long,
        env = "PLANQK_BASE_URL",
        default_value = planqk_client::config::DEFAULT_BASE_URL
    )]
    base_url: String,

    /// Gateway token endpoint
    #[arg(
        long,
        env = "PLANQK_TOKEN_URL",
        default_value = planqk_client::config::DEFAULT_TOKEN_URL
    )]
    token_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "PLANQK_REQUEST_TIMEOUT", default_value_t = 30)]
    request_timeout: u64,

    /// Log requests and poll progress
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "planqk=debug,planqk_client=debug"
    } else {
        "planqk=info,planqk_client=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config {
        api_key: cli.api_key,
        base_url: cli.base_url,
        token_url: cli.token_url,
        request_timeout: cli.request_timeout,
    };

    handle_command(cli.command, &config).await
}
