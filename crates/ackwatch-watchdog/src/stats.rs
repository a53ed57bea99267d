//! Coordinator metrics.
//!
//! Counters are written only by the coordinator loop and may be read from any
//! thread. `Ordering::Relaxed` is enough: each value is independent and a
//! snapshot only has to be eventually consistent.

use core::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

/// Point-in-time view of the coordinator counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoordinatorStats {
    /// Work items absorbed into the pending buffer.
    pub arrivals: u64,
    /// Acknowledgments absorbed into the acknowledged set.
    pub acknowledgments: u64,
    /// Items retired because they were acknowledged.
    pub acknowledged_in_time: u64,
    /// Items handed to the reporter.
    pub timeouts_reported: u64,
    /// Reporter invocations that panicked.
    pub reporter_failures: u64,
    /// Acknowledgments dropped after outliving the orphan TTL.
    pub orphan_acks_expired: u64,
    /// Items dropped without an outcome by a discarding shutdown.
    pub discarded: u64,
    /// Items currently in the pending buffer.
    pub pending: u64,
    /// Acknowledgments held for items that have not reached the head yet.
    pub acknowledged_set_len: u64,
}

impl CoordinatorStats {
    /// Items that received an outcome, acknowledged or reported.
    #[must_use]
    pub fn retired(&self) -> u64 {
        self.acknowledged_in_time + self.timeouts_reported
    }
}

#[derive(Debug, Default)]
pub(crate) struct CoordinatorMetrics {
    arrivals: AtomicU64,
    acknowledgments: AtomicU64,
    acknowledged_in_time: AtomicU64,
    timeouts_reported: AtomicU64,
    reporter_failures: AtomicU64,
    orphan_acks_expired: AtomicU64,
    discarded: AtomicU64,
    pending: AtomicU64,
    acknowledged_set_len: AtomicU64,
}

fn as_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

impl CoordinatorMetrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn inc_arrivals(&self) {
        self.arrivals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_acknowledgments(&self) {
        self.acknowledgments.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_acknowledged_in_time(&self) {
        self.acknowledged_in_time.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_timeouts_reported(&self) {
        self.timeouts_reported.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_reporter_failures(&self) {
        self.reporter_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_orphan_acks_expired(&self, count: usize) {
        self.orphan_acks_expired
            .fetch_add(as_u64(count), Ordering::Relaxed);
    }

    pub(crate) fn add_discarded(&self, count: usize) {
        self.discarded.fetch_add(as_u64(count), Ordering::Relaxed);
    }

    /// Publish the current buffer and set sizes.
    pub(crate) fn set_gauges(&self, pending: usize, acknowledged_set_len: usize) {
        self.pending.store(as_u64(pending), Ordering::Relaxed);
        self.acknowledged_set_len
            .store(as_u64(acknowledged_set_len), Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CoordinatorStats {
        CoordinatorStats {
            arrivals: self.arrivals.load(Ordering::Relaxed),
            acknowledgments: self.acknowledgments.load(Ordering::Relaxed),
            acknowledged_in_time: self.acknowledged_in_time.load(Ordering::Relaxed),
            timeouts_reported: self.timeouts_reported.load(Ordering::Relaxed),
            reporter_failures: self.reporter_failures.load(Ordering::Relaxed),
            orphan_acks_expired: self.orphan_acks_expired.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            pending: self.pending.load(Ordering::Relaxed),
            acknowledged_set_len: self.acknowledged_set_len.load(Ordering::Relaxed),
        }
    }
}
