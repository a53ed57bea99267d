//! Submission handle for producers.

use tokio::sync::mpsc::{
    self,
    error::{SendError, TrySendError},
};

use crate::error::{WatchdogError, WatchdogResult};
use crate::item::WorkItem;

/// Cloneable handle that feeds arrivals and acknowledgments to a running
/// coordinator.
///
/// Arrivals and acknowledgments travel on separate bounded channels. Signals
/// from one handle on one channel keep their order; no order is guaranteed
/// between the two channels.
#[derive(Debug, Clone)]
pub struct WatchdogHandle {
    arrivals: mpsc::Sender<WorkItem>,
    acks: mpsc::Sender<String>,
}

impl WatchdogHandle {
    pub(crate) fn new(arrivals: mpsc::Sender<WorkItem>, acks: mpsc::Sender<String>) -> Self {
        Self { arrivals, acks }
    }

    /// Submit a work item, waiting for channel capacity.
    ///
    /// If the coordinator falls behind, this waits for as long as the
    /// arrival channel stays full. Use [`try_submit_arrival`](Self::try_submit_arrival)
    /// where the caller must not stall.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::Stopped`] if the coordinator no longer accepts
    /// signals.
    pub async fn submit_arrival(&self, item: WorkItem) -> WatchdogResult<()> {
        self.arrivals
            .send(item)
            .await
            .map_err(|SendError(item)| WatchdogError::stopped(item.token()))
    }

    /// Submit a work item stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::Stopped`] if the coordinator no longer accepts
    /// signals.
    pub async fn arrive(&self, token: impl Into<String>) -> WatchdogResult<()> {
        self.submit_arrival(WorkItem::new(token)).await
    }

    /// Submit an acknowledgment, waiting for channel capacity.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::Stopped`] if the coordinator no longer accepts
    /// signals.
    pub async fn submit_ack(&self, token: impl Into<String>) -> WatchdogResult<()> {
        self.acks
            .send(token.into())
            .await
            .map_err(|SendError(token)| WatchdogError::stopped(token))
    }

    /// Submit a work item without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::ChannelFull`] if the arrival channel is at
    /// capacity, or [`WatchdogError::Stopped`] after shutdown.
    pub fn try_submit_arrival(&self, item: WorkItem) -> WatchdogResult<()> {
        self.arrivals.try_send(item).map_err(|err| match err {
            TrySendError::Full(item) => WatchdogError::channel_full(item.token()),
            TrySendError::Closed(item) => WatchdogError::stopped(item.token()),
        })
    }

    /// Submit an acknowledgment without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::ChannelFull`] if the acknowledgment channel is
    /// at capacity, or [`WatchdogError::Stopped`] after shutdown.
    pub fn try_submit_ack(&self, token: impl Into<String>) -> WatchdogResult<()> {
        self.acks.try_send(token.into()).map_err(|err| match err {
            TrySendError::Full(token) => WatchdogError::channel_full(token),
            TrySendError::Closed(token) => WatchdogError::stopped(token),
        })
    }

    /// Submit a work item from a thread that is not running async code.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::Stopped`] if the coordinator no longer accepts
    /// signals.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_submit_arrival(&self, item: WorkItem) -> WatchdogResult<()> {
        self.arrivals
            .blocking_send(item)
            .map_err(|SendError(item)| WatchdogError::stopped(item.token()))
    }

    /// Submit an acknowledgment from a thread that is not running async code.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::Stopped`] if the coordinator no longer accepts
    /// signals.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_submit_ack(&self, token: impl Into<String>) -> WatchdogResult<()> {
        self.acks
            .blocking_send(token.into())
            .map_err(|SendError(token)| WatchdogError::stopped(token))
    }

    /// Returns `true` once the coordinator stopped accepting signals.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.arrivals.is_closed() || self.acks.is_closed()
    }
}
