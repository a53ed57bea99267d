//! Error types for the watchdog coordinator.
//!
//! A full buffer is never an error (the ring grows) and a timed-out work item
//! is a report, not an error. What remains are lifecycle misuse, rejected
//! submissions and configuration problems.

use thiserror::Error;

/// Errors that can occur while configuring, running or feeding a coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchdogError {
    /// Invalid timeout policy provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `start` was called on a coordinator that is already running.
    #[error("Coordinator is already running")]
    AlreadyStarted,

    /// The coordinator has not been started or has already been stopped.
    #[error("Coordinator is not running")]
    NotRunning,

    /// No tokio runtime is available to host the coordinator loop.
    #[error("No tokio runtime available to run the coordinator")]
    RuntimeUnavailable,

    /// A submission was rejected because the coordinator stopped accepting signals.
    #[error("Coordinator stopped; signal for token '{0}' was not accepted")]
    Stopped(String),

    /// A non-waiting submission found its channel at capacity.
    #[error("Channel full; signal for token '{0}' was not accepted")]
    ChannelFull(String),

    /// The coordinator task ended abnormally.
    #[error("Coordinator task failed: {0}")]
    TaskFailed(String),
}

impl WatchdogError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create a stopped error for the rejected token.
    #[must_use]
    pub fn stopped(token: impl Into<String>) -> Self {
        Self::Stopped(token.into())
    }

    /// Create a channel full error for the rejected token.
    #[must_use]
    pub fn channel_full(token: impl Into<String>) -> Self {
        Self::ChannelFull(token.into())
    }

    /// Create a task failed error.
    #[must_use]
    pub fn task_failed(reason: impl Into<String>) -> Self {
        Self::TaskFailed(reason.into())
    }

    /// Returns `true` if retrying the same submission later can succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ChannelFull(_))
    }
}

/// A specialized `Result` type for watchdog operations.
pub type WatchdogResult<T> = std::result::Result<T, WatchdogError>;
