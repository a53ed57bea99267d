//! Output formatting for CLI responses

use ackwatch_watchdog::{CoordinatorStats, TimeoutPolicy};
use colored::Colorize;
use serde::Serialize;
use serde_json::json;

use crate::commands::simulate::SimulationSummary;
use crate::error::CliError;

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print error in JSON format
pub fn print_error_json(error: &CliError) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "exit_code": error.exit_code(),
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &CliError) {
    eprintln!("{} {error}", "Error:".red().bold());

    let mut source = std::error::Error::source(error);
    while let Some(err) = source {
        eprintln!("  {} {err}", "Caused by:".yellow());
        source = err.source();
    }
}

/// Print the effective policy
pub fn print_policy(policy: &TimeoutPolicy, json: bool) -> Result<(), CliError> {
    if json {
        print_json(&json!({ "success": true, "policy": policy }))
    } else {
        println!("{}", "Effective policy:".bold());
        print_json(policy)
    }
}

/// Print the outcome of a simulation run
pub fn print_simulation(summary: &SimulationSummary, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(&json!({ "success": true, "simulation": summary }));
    }

    println!(
        "{} {} interactions, {} acknowledgments scheduled",
        "Simulated".bold(),
        summary.dispatched,
        summary.acks_scheduled
    );
    print_stats_human(&summary.stats);

    if summary.timeouts.is_empty() {
        println!("{}", "No timeouts".green());
    } else {
        println!("{}", "Timeouts:".yellow().bold());
        for line in &summary.timeouts {
            println!("  {line}");
        }
    }
    Ok(())
}

fn print_stats_human(stats: &CoordinatorStats) {
    let rows = [
        ("arrivals", stats.arrivals),
        ("acknowledgments", stats.acknowledgments),
        ("acknowledged in time", stats.acknowledged_in_time),
        ("timeouts reported", stats.timeouts_reported),
        ("reporter failures", stats.reporter_failures),
        ("orphan acks expired", stats.orphan_acks_expired),
        ("discarded", stats.discarded),
        ("pending", stats.pending),
        ("orphan acks held", stats.acknowledged_set_len),
    ];
    for (label, value) in rows {
        println!("  {:<22} {value}", format!("{label}:").as_str().dimmed());
    }
}
