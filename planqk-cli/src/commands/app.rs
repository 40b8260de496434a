//! Application command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use planqk_client::PlanqkClient;
use planqk_core::domain::application::Subscription;

use crate::output::print_count;

/// Application subcommands
#[derive(Subcommand)]
pub enum AppCommands {
    /// List applications
    List,
    /// Create an application
    Create {
        name: String,
    },
    /// Delete an application
    Remove {
        name: String,
    },
    /// Subscribe an application to a service
    Subscribe {
        /// Application name
        application: String,
        /// Service name
        service: String,
    },
    /// List the subscriptions of an application
    Subscriptions {
        application: String,
    },
    /// Remove the subscription of an application
    Unsubscribe {
        application: String,
    },
}

/// Handle application commands
pub async fn handle_app_command(command: AppCommands, client: &PlanqkClient) -> Result<()> {
    match command {
        AppCommands::List => {
            let applications = client.get_applications().await?;
            if print_count(applications.len(), "application") {
                for application in &applications {
                    println!("  {} {}", "▸".cyan(), application.name.bold());
                    println!("    ID: {}", application.id.dimmed());
                    println!();
                }
            }
            Ok(())
        }
        AppCommands::Create { name } => {
            let application = client.create_application(&name).await?;
            println!(
                "{} Application {} created ({})",
                "✓".green(),
                application.name.cyan(),
                application.id.dimmed()
            );
            if let Some(key) = &application.client_id {
                println!("  Consumer key: {}", key);
            }
            Ok(())
        }
        AppCommands::Remove { name } => {
            client.remove_application(&name).await?;
            println!("{} Application {} removed", "✓".green(), name.cyan());
            Ok(())
        }
        AppCommands::Subscribe {
            application,
            service,
        } => {
            let subscription = client
                .subscribe_application_to_service(&application, &service)
                .await?;
            println!(
                "{} {} subscribed to {} ({})",
                "✓".green(),
                application.cyan(),
                service.cyan(),
                subscription.id.dimmed()
            );
            Ok(())
        }
        AppCommands::Subscriptions { application } => {
            let subscriptions = client.get_all_subscriptions(&application).await?;
            if print_count(subscriptions.len(), "subscription") {
                for subscription in &subscriptions {
                    print_subscription(subscription);
                }
            }
            Ok(())
        }
        AppCommands::Unsubscribe { application } => {
            client.remove_subscription(&application).await?;
            println!(
                "{} Subscription of {} removed",
                "✓".green(),
                application.cyan()
            );
            Ok(())
        }
    }
}

fn print_subscription(subscription: &Subscription) {
    println!("  {} Subscription {}", "▸".cyan(), subscription.id.dimmed());
    if let Some(service_id) = &subscription.service_id {
        println!("    Service: {}", service_id);
    }
    if let Some(created) = &subscription.created_at {
        println!("    Created: {}", created.dimmed());
    }
    println!();
}
