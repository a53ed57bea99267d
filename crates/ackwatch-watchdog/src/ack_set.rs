//! Tokens acknowledged ahead of their retirement.

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Outstanding acknowledgments for one token.
#[derive(Debug, Clone, Copy)]
struct Pending {
    count: usize,
    last_recorded: Instant,
}

/// Multiset of acknowledged tokens.
///
/// Each acknowledgment retires exactly one work item, so two in-flight items
/// sharing a token need two acknowledgments. Only the coordinator loop
/// touches this set.
#[derive(Debug, Default)]
pub(crate) struct AcknowledgedSet {
    entries: HashMap<String, Pending>,
    total: usize,
}

impl AcknowledgedSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record one acknowledgment for `token`.
    pub(crate) fn record(&mut self, token: String, now: Instant) {
        let pending = self.entries.entry(token).or_insert(Pending {
            count: 0,
            last_recorded: now,
        });
        pending.count += 1;
        pending.last_recorded = now;
        self.total += 1;
    }

    /// Consume one acknowledgment for `token`, returning whether one was held.
    pub(crate) fn remove(&mut self, token: &str) -> bool {
        let Some(pending) = self.entries.get_mut(token) else {
            return false;
        };
        pending.count -= 1;
        if pending.count == 0 {
            self.entries.remove(token);
        }
        self.total -= 1;
        true
    }

    /// Number of acknowledgments held, counting repeats of a token.
    pub(crate) fn len(&self) -> usize {
        self.total
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Drop every token whose latest acknowledgment is older than `ttl`.
    ///
    /// Returns the number of acknowledgments dropped.
    pub(crate) fn expire_older_than(&mut self, now: Instant, ttl: Duration) -> usize {
        let mut expired = 0;
        self.entries.retain(|_, pending| {
            let keep = now.saturating_duration_since(pending.last_recorded) <= ttl;
            if !keep {
                expired += pending.count;
            }
            keep
        });
        self.total -= expired;
        expired
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_remove() {
        let now = Instant::now();
        let mut set = AcknowledgedSet::new();
        set.record("a".into(), now);
        assert_eq!(set.len(), 1);

        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_repeated_token_is_counted() {
        let now = Instant::now();
        let mut set = AcknowledgedSet::new();
        set.record("dup".into(), now);
        set.record("dup".into(), now);
        assert_eq!(set.len(), 2);

        assert!(set.remove("dup"));
        assert_eq!(set.len(), 1);
        assert!(set.remove("dup"));
        assert!(!set.remove("dup"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_expiry() {
        let now = Instant::now();
        let mut set = AcknowledgedSet::new();
        set.record("old".into(), now);
        set.record("old".into(), now);
        set.record("new".into(), now + Duration::from_secs(10));

        let expired = set.expire_older_than(now + Duration::from_secs(17), Duration::from_secs(16));
        assert_eq!(expired, 2);
        assert_eq!(set.len(), 1);
        assert!(set.remove("new"));

        set.record("x".into(), now);
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_latest_acknowledgment_keeps_token_alive() {
        let now = Instant::now();
        let mut set = AcknowledgedSet::new();
        set.record("a".into(), now);
        set.record("a".into(), now + Duration::from_secs(10));

        let expired = set.expire_older_than(now + Duration::from_secs(17), Duration::from_secs(16));
        assert_eq!(expired, 0);
        assert_eq!(set.len(), 2);
    }
}
