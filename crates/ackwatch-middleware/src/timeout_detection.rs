//! Handler that registers every dispatched interaction with a watchdog.

use ackwatch_watchdog::{WatchdogHandle, WorkItem};
use async_trait::async_trait;

use crate::error::MiddlewareResult;
use crate::handler::{Flow, Handler};
use crate::interaction::Interaction;

/// Submits an arrival for each interaction, then lets the chain continue.
///
/// Place it first in a chain so the arrival time reflects when the
/// interaction was received. Call [`acknowledge`](Self::acknowledge) once the
/// interaction has been answered.
#[derive(Debug, Clone)]
pub struct TimeoutDetectionHandler {
    watchdog: WatchdogHandle,
}

impl TimeoutDetectionHandler {
    /// Create a handler that feeds `watchdog`.
    #[must_use]
    pub fn new(watchdog: WatchdogHandle) -> Self {
        Self { watchdog }
    }

    /// Report that the interaction with `token` was answered.
    ///
    /// # Errors
    ///
    /// Returns an error if the watchdog is no longer running.
    pub async fn acknowledge(&self, token: impl Into<String>) -> MiddlewareResult<()> {
        self.watchdog.submit_ack(token).await?;
        Ok(())
    }
}

#[async_trait]
impl<S: Sync> Handler<S> for TimeoutDetectionHandler {
    fn name(&self) -> &str {
        "timeout_detection"
    }

    async fn handle(&self, interaction: &Interaction, _state: &S) -> MiddlewareResult<Flow> {
        let item = WorkItem::new(interaction.token.clone()).with_detail(interaction.summary());
        self.watchdog.submit_arrival(item).await?;
        Ok(Flow::Continue)
    }
}
