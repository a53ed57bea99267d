//! Timeout policy for the coordinator.
//!
//! The policy is fixed at construction. The defaults suit a protocol that
//! demands an acknowledgment within about three seconds: a four second
//! deadline leaves a one second margin before an item is reported.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{WatchdogError, WatchdogResult};

/// Default time an item may stay unacknowledged before it is reported.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(4);
/// Default idle cadence of the coordinator loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Default bound of each inbound channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 128;
/// Default usable capacity of the pending-item ring before its first growth.
pub const DEFAULT_INITIAL_BUFFER_CAPACITY: usize = 64;
/// Default age after which an unmatched acknowledgment is discarded.
pub const DEFAULT_ORPHAN_ACK_TTL: Duration = Duration::from_secs(16);

/// Coordinator configuration.
///
/// Durations are serialized as whole milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutPolicy {
    /// Maximum time between arrival and acknowledgment.
    #[serde(with = "duration_millis")]
    pub deadline: Duration,
    /// Longest the loop sleeps before re-checking its inputs.
    #[serde(with = "duration_millis")]
    pub poll_interval: Duration,
    /// Bound of the arrival channel and of the acknowledgment channel.
    pub channel_capacity: usize,
    /// Usable capacity of the pending-item ring before it first grows.
    pub initial_buffer_capacity: usize,
    /// Age after which an acknowledgment with no matching arrival is dropped.
    #[serde(with = "duration_millis")]
    pub orphan_ack_ttl: Duration,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DEADLINE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            initial_buffer_capacity: DEFAULT_INITIAL_BUFFER_CAPACITY,
            orphan_ack_ttl: DEFAULT_ORPHAN_ACK_TTL,
        }
    }
}

impl TimeoutPolicy {
    /// Validate the policy.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is zero where a positive value is
    /// required, if the poll interval exceeds the deadline, or if orphan
    /// acknowledgments would expire before the deadline.
    pub fn validate(&self) -> WatchdogResult<()> {
        if self.deadline.is_zero() {
            return Err(WatchdogError::invalid_configuration(
                "deadline must be greater than 0",
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(WatchdogError::invalid_configuration(
                "poll_interval must be greater than 0",
            ));
        }
        if self.poll_interval > self.deadline {
            return Err(WatchdogError::invalid_configuration(
                "poll_interval must not exceed deadline",
            ));
        }
        if self.channel_capacity == 0 {
            return Err(WatchdogError::invalid_configuration(
                "channel_capacity must be greater than 0",
            ));
        }
        if self.orphan_ack_ttl < self.deadline {
            return Err(WatchdogError::invalid_configuration(
                "orphan_ack_ttl must be at least the deadline",
            ));
        }
        Ok(())
    }

    /// Create a policy builder.
    #[must_use]
    pub fn builder() -> TimeoutPolicyBuilder {
        TimeoutPolicyBuilder::default()
    }
}

/// Builder for `TimeoutPolicy`.
#[derive(Debug, Default)]
pub struct TimeoutPolicyBuilder {
    policy: TimeoutPolicy,
}

impl TimeoutPolicyBuilder {
    /// Set the acknowledgment deadline.
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.policy.deadline = deadline;
        self
    }

    /// Set the poll interval.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.policy.poll_interval = interval;
        self
    }

    /// Set the capacity of each inbound channel.
    #[must_use]
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.policy.channel_capacity = capacity;
        self
    }

    /// Set the initial ring capacity.
    #[must_use]
    pub fn initial_buffer_capacity(mut self, capacity: usize) -> Self {
        self.policy.initial_buffer_capacity = capacity;
        self
    }

    /// Set the orphan acknowledgment TTL.
    #[must_use]
    pub fn orphan_ack_ttl(mut self, ttl: Duration) -> Self {
        self.policy.orphan_ack_ttl = ttl;
        self
    }

    /// Build the policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy is invalid.
    pub fn build(self) -> WatchdogResult<TimeoutPolicy> {
        self.policy.validate()?;
        Ok(self.policy)
    }
}
