//! ackwatchctl - inspect watchdog policies and simulate interaction traffic

#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::PolicyArgs;
use crate::commands::simulate::SimulateArgs;
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "ackwatchctl")]
#[command(about = "Inspect ackwatch timeout policies and simulate interaction traffic")]
#[command(version)]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch synthetic interactions and report which ones timed out
    Simulate(SimulateArgs),

    /// Print the effective timeout policy
    Policy(PolicyArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("ackwatchctl={log_level},ackwatch_watchdog={log_level},ackwatch_middleware={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Commands::Simulate(args) => commands::simulate::execute(args, cli.json).await,
        Commands::Policy(args) => commands::policy::execute(args, cli.json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_policy_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["ackwatchctl", "policy"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        assert!(matches!(
            cli.command,
            Commands::Policy(PolicyArgs { config: None, .. })
        ));
        Ok(())
    }

    #[test]
    fn parse_global_flags_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["ackwatchctl", "policy", "--json", "-vv"])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn parse_simulate_arguments() -> TestResult {
        let cli = Cli::try_parse_from([
            "ackwatchctl",
            "simulate",
            "--count",
            "5",
            "--ack-ratio",
            "0.25",
            "--max-ack-delay-ms",
            "300",
            "--deadline-ms",
            "200",
            "--poll-ms",
            "10",
            "--channel-capacity",
            "4",
            "--seed",
            "9",
        ])?;
        let Commands::Simulate(args) = cli.command else {
            return Err("expected simulate".into());
        };
        assert_eq!(args.count, 5);
        assert_eq!(args.max_ack_delay_ms, 300);
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.policy.deadline_ms, Some(200));
        assert_eq!(args.policy.poll_ms, Some(10));
        assert_eq!(args.policy.channel_capacity, Some(4));
        Ok(())
    }

    #[test]
    fn parse_simulate_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["ackwatchctl", "simulate"])?;
        let Commands::Simulate(args) = cli.command else {
            return Err("expected simulate".into());
        };
        assert_eq!(args.count, 20);
        assert_eq!(args.max_ack_delay_ms, 6000);
        assert!(args.policy.config.is_none());
        Ok(())
    }
}
