//! Error types for ackwatchctl

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Watchdog error: {0}")]
    Watchdog(#[from] ackwatch_watchdog::WatchdogError),

    #[error("Middleware error: {0}")]
    Middleware(#[from] ackwatch_middleware::MiddlewareError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidArgument(_) => 2,
            Self::InvalidConfiguration(_) | Self::JsonError(_) => 4,
            Self::IoError(_) => 5,
            Self::Watchdog(_) | Self::Middleware(_) => 1,
        }
    }
}
