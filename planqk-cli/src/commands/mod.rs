//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod app;
mod job;
mod pool;
mod service;
mod token;

pub use app::AppCommands;
pub use job::JobCommands;
pub use pool::PoolCommands;
pub use service::ServiceCommands;

use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use planqk_client::PollConfig;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Managed service management
    Service {
        #[command(subcommand)]
        command: ServiceCommands,
    },
    /// Applications and their subscriptions
    App {
        #[command(subcommand)]
        command: AppCommands,
    },
    /// Service job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Data pool management
    Pool {
        #[command(subcommand)]
        command: PoolCommands,
    },
    /// Request a gateway access token for an application
    Token {
        /// Application whose consumer key and secret are used
        application: String,
    },
}

/// Timing options of commands that wait for a build or job
#[derive(Args, Debug, Clone, Copy)]
pub struct PollArgs {
    /// Give up waiting after this many seconds
    #[arg(long, default_value_t = 500)]
    pub timeout: u64,

    /// Seconds between two status checks
    #[arg(long, default_value_t = 1)]
    pub interval: u64,
}

impl PollArgs {
    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new(
            Duration::from_secs(self.timeout),
            Duration::from_secs(self.interval),
        )
    }
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        Commands::Service { command } => service::handle_service_command(command, &client).await,
        Commands::App { command } => app::handle_app_command(command, &client).await,
        Commands::Job { command } => job::handle_job_command(command, &client).await,
        Commands::Pool { command } => pool::handle_pool_command(command, &client).await,
        Commands::Token { application } => token::print_access_token(&client, &application).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_poll_args_defaults() {
        let cli = TestCli::parse_from(["planqk", "job", "wait", "abc"]);
        match cli.command {
            Commands::Job {
                command: JobCommands::Wait { id, poll },
            } => {
                assert_eq!(id, "abc");
                assert_eq!(poll.poll_config(), PollConfig::default());
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_service_create_arguments() {
        let cli = TestCli::parse_from([
            "planqk",
            "service",
            "create",
            "solver",
            "--user-code",
            "user_code.zip",
            "--api-definition",
            "openapi-spec.yml",
            "--memory",
            "8192",
            "--wait",
            "--interval",
            "5",
        ]);
        match cli.command {
            Commands::Service {
                command:
                    ServiceCommands::Create {
                        name,
                        memory,
                        wait,
                        poll,
                        ..
                    },
            } => {
                assert_eq!(name, "solver");
                assert_eq!(memory, 8192);
                assert!(wait);
                assert_eq!(poll.interval, 5);
            }
            _ => panic!("unexpected command"),
        }
    }
}
