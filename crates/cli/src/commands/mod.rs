//! Command definitions and handlers

pub mod policy;
pub mod simulate;

use clap::Args;
use std::path::PathBuf;

/// Policy file and per-field overrides shared by the commands.
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// JSON policy file; missing fields take their defaults
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the acknowledgment deadline (milliseconds)
    #[arg(long, value_name = "MS")]
    pub deadline_ms: Option<u64>,

    /// Override the poll interval (milliseconds)
    #[arg(long, value_name = "MS")]
    pub poll_ms: Option<u64>,

    /// Override the capacity of each inbound channel
    #[arg(long, value_name = "N")]
    pub channel_capacity: Option<usize>,

    /// Override how long an unmatched acknowledgment is kept (milliseconds)
    #[arg(long, value_name = "MS")]
    pub orphan_ack_ttl_ms: Option<u64>,
}
