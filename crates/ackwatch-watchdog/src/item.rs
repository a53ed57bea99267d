//! Work items and timeout reports.

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// A unit of inbound work that must be acknowledged before the deadline.
///
/// Two items are considered the same when their tokens are equal, regardless
/// of when they started or what they describe.
#[derive(Clone)]
pub struct WorkItem {
    token: String,
    started_at: Instant,
    detail: Option<String>,
}

impl WorkItem {
    /// Create a work item stamped with the current time.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::started_at(token, Instant::now())
    }

    /// Create a work item with an explicit start time.
    #[must_use]
    pub fn started_at(token: impl Into<String>, started_at: Instant) -> Self {
        Self {
            token: token.into(),
            started_at,
            detail: None,
        }
    }

    /// Attach a human-readable description that is carried into reports.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// The identifier that acknowledgments are matched against.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// When the item arrived.
    #[must_use]
    pub fn started_at_instant(&self) -> Instant {
        self.started_at
    }

    /// Optional description of the item.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Time elapsed between arrival and `now`, saturating at zero.
    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }
}

impl PartialEq for WorkItem {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for WorkItem {}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("token", &self.token)
            .field("detail", &self.detail)
            .finish_non_exhaustive()
    }
}

/// A work item that was not acknowledged within the deadline.
#[derive(Debug, Clone)]
pub struct TimeoutReport {
    /// The item as it was submitted.
    pub item: WorkItem,
    /// How long the item had been pending when it was reported.
    pub elapsed: Duration,
}

impl TimeoutReport {
    /// Token of the reported item.
    #[must_use]
    pub fn token(&self) -> &str {
        self.item.token()
    }
}

impl fmt::Display for TimeoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Timeout] {:?} {}", self.elapsed, self.item.token)?;
        if let Some(detail) = &self.item.detail {
            write!(f, " | {detail}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_compare_by_token() {
        let now = Instant::now();
        let a = WorkItem::started_at("tok", now);
        let b = WorkItem::started_at("tok", now + Duration::from_secs(1)).with_detail("other");
        let c = WorkItem::started_at("tok-2", now);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_elapsed_saturates() {
        let now = Instant::now();
        let item = WorkItem::started_at("tok", now + Duration::from_secs(1));
        assert_eq!(item.elapsed_at(now), Duration::ZERO);
        assert_eq!(
            item.elapsed_at(now + Duration::from_secs(3)),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_report_display() {
        let item = WorkItem::new("tok-9").with_detail("Command | ping");
        let report = TimeoutReport {
            item,
            elapsed: Duration::from_millis(4100),
        };
        assert_eq!(report.to_string(), "[Timeout] 4.1s tok-9 | Command | ping");

        let report = TimeoutReport {
            item: WorkItem::new("bare"),
            elapsed: Duration::from_secs(5),
        };
        assert_eq!(report.to_string(), "[Timeout] 5s bare");
    }
}
