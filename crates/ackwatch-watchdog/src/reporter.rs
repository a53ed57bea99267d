//! Timeout reporting.
//!
//! A reporter is invoked by the coordinator loop, once per timed-out item and
//! in arrival order. It runs on the loop task, so a slow reporter delays
//! detection of later timeouts.

use crate::item::TimeoutReport;

/// Receives timeout reports from the coordinator.
pub trait Reporter: Send + Sync {
    /// Handle one timed-out work item.
    fn report(&self, report: &TimeoutReport);
}

impl<F> Reporter for F
where
    F: Fn(&TimeoutReport) + Send + Sync,
{
    fn report(&self, report: &TimeoutReport) {
        self(report);
    }
}

/// Reporter that emits a `warn!` event per timed-out item.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, report: &TimeoutReport) {
        tracing::warn!(
            token = report.token(),
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            detail = report.item.detail().unwrap_or(""),
            "work item was not acknowledged before its deadline"
        );
    }
}
