//! Error types for handler dispatch.

use ackwatch_watchdog::WatchdogError;
use thiserror::Error;

/// Errors returned by handlers and by the chain that runs them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiddlewareError {
    /// A handler returned a failure.
    #[error("Handler '{handler}' failed: {reason}")]
    HandlerFailed {
        /// Name of the failing handler.
        handler: String,
        /// Failure description.
        reason: String,
    },

    /// A handler panicked while the chain had panic containment enabled.
    #[error("Handler '{handler}' panicked: {message}")]
    HandlerPanicked {
        /// Name of the panicking handler.
        handler: String,
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The watchdog rejected a signal.
    #[error(transparent)]
    Watchdog(#[from] WatchdogError),
}

impl MiddlewareError {
    /// Create a handler failure.
    #[must_use]
    pub fn handler_failed(handler: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::HandlerFailed {
            handler: handler.into(),
            reason: reason.into(),
        }
    }

    /// Create a handler panic error.
    #[must_use]
    pub fn handler_panicked(handler: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HandlerPanicked {
            handler: handler.into(),
            message: message.into(),
        }
    }
}

/// A specialized `Result` type for middleware operations.
pub type MiddlewareResult<T> = std::result::Result<T, MiddlewareError>;
