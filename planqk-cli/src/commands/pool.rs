//! Data pool command handlers

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Subcommand;
use colored::*;
use planqk_client::{FileUpload, PlanqkClient};

use crate::output::print_count;

/// Data pool subcommands
#[derive(Subcommand)]
pub enum PoolCommands {
    /// List data pools
    List,
    /// Create an empty data pool
    Create {
        name: String,
    },
    /// Delete a data pool
    Remove {
        name: String,
    },
    /// List the files of a data pool
    Files {
        name: String,
    },
    /// Upload a file into a data pool
    Upload {
        /// Data pool name
        name: String,
        /// File to upload
        path: PathBuf,
    },
}

/// Handle data pool commands
pub async fn handle_pool_command(command: PoolCommands, client: &PlanqkClient) -> Result<()> {
    match command {
        PoolCommands::List => {
            let pools = client.get_data_pools().await?;
            if print_count(pools.len(), "data pool") {
                for pool in &pools {
                    println!("  {} {}", "▸".cyan(), pool.name.bold());
                    println!("    ID: {}", pool.id.dimmed());
                    println!();
                }
            }
            Ok(())
        }
        PoolCommands::Create { name } => {
            let pool = client.create_data_pool(&name).await?;
            println!(
                "{} Data pool {} created ({})",
                "✓".green(),
                pool.name.cyan(),
                pool.id.dimmed()
            );
            Ok(())
        }
        PoolCommands::Remove { name } => {
            if !client.remove_data_pool(&name).await? {
                return Err(anyhow!("Data pool '{}' could not be removed", name));
            }
            println!("{} Data pool {} removed", "✓".green(), name.cyan());
            Ok(())
        }
        PoolCommands::Files { name } => {
            let files = client.get_data_pool_file_information(&name).await?;
            if print_count(files.len(), "file") {
                for (file_name, info) in &files {
                    println!("  {} {}", "▸".cyan(), file_name.bold());
                    println!("    File:       {}", info.file_id.dimmed());
                    println!("    Descriptor: {}", info.data_source_descriptor_id.dimmed());
                    println!();
                }
            }
            Ok(())
        }
        PoolCommands::Upload { name, path } => {
            let file = FileUpload::from_path(&path).await?;
            let file_name = file.file_name.clone();
            if !client.add_data_to_data_pool(&name, file).await? {
                return Err(anyhow!("Data pool '{}' rejected {}", name, file_name));
            }
            println!(
                "{} {} uploaded to {}",
                "✓".green(),
                file_name,
                name.cyan()
            );
            Ok(())
        }
    }
}
