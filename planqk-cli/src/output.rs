//! Terminal formatting shared by the command handlers

use anyhow::{Result, anyhow};
use colored::*;
use planqk_core::domain::status::Status;
use serde_json::Value;

/// Colorize a platform status for display
pub fn colorize_status(status: &Status) -> ColoredString {
    let text = status.as_str();
    match status {
        Status::Pending => text.yellow(),
        Status::Running => text.cyan(),
        Status::Succeeded | Status::Success => text.green(),
        Status::Failed => text.red(),
        Status::Cancelled => text.dimmed(),
        Status::Other(_) => text.normal(),
    }
}

/// Print a JSON value, pretty when possible
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", value),
    }
}

/// Print a `Found N <what>(s):` header, or a notice when empty
///
/// Returns whether there is anything to print.
pub fn print_count(count: usize, what: &str) -> bool {
    if count == 0 {
        println!("{}", format!("No {}s found.", what).yellow());
        false
    } else {
        println!("{}", format!("Found {} {}(s):", count, what).bold());
        println!();
        true
    }
}

/// Print the outcome of a wait; a failed wait is an error
pub fn report_outcome(what: &str, succeeded: bool) -> Result<()> {
    if succeeded {
        println!("{} {} succeeded", "✓".green(), what);
        Ok(())
    } else {
        println!("{} {} failed", "✗".red(), what);
        Err(anyhow!("{} failed", what))
    }
}
