//! # ackwatch-watchdog
//!
//! Reports work items that were not acknowledged before a deadline.
//!
//! Producers submit arrivals and acknowledgments through a cloneable
//! [`WatchdogHandle`]. A single background task owns the pending items, kept
//! in arrival order in a [`GrowableRingBuffer`](ackwatch_ring::GrowableRingBuffer),
//! and the set of tokens acknowledged so far. Only the oldest pending item is
//! ever inspected, so detection costs O(1) amortized per item no matter how
//! many are in flight. No per-item timers are created.
//!
//! ## Architecture
//!
//! - [`coordinator`] - Lifecycle and the single-owner processing loop
//! - [`handle`] - Submission handle with waiting and non-waiting variants
//! - [`policy`] - Deadline, poll interval and capacity configuration
//! - [`reporter`] - Timeout report sink and the default `tracing` reporter
//! - [`item`] - Work items and timeout reports
//! - [`stats`] - Counter snapshot
//! - [`error`] - Watchdog-specific error types
//!
//! ## Outcomes
//!
//! Every accepted item is retired exactly once: either quietly, because its
//! token was acknowledged, or through the [`Reporter`] once its age reaches
//! the deadline. A reporter that panics is contained and counted; processing
//! continues with the next item. The only way to drop an item without an
//! outcome is an explicit [`ShutdownMode::Discard`].
//!
//! ## Example
//!
//! ```rust
//! use ackwatch_watchdog::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), WatchdogError> {
//! let policy = TimeoutPolicy::builder()
//!     .deadline(Duration::from_millis(200))
//!     .poll_interval(Duration::from_millis(10))
//!     .orphan_ack_ttl(Duration::from_secs(1))
//!     .build()?;
//!
//! let mut coordinator = WatchdogCoordinator::new(policy, |report: &TimeoutReport| {
//!     eprintln!("{report}");
//! })?;
//! let handle = coordinator.start()?;
//!
//! handle.arrive("acked").await?;
//! handle.arrive("forgotten").await?;
//! handle.submit_ack("acked").await?;
//!
//! let stats = coordinator.stop(ShutdownMode::Drain).await?;
//! assert_eq!(stats.acknowledged_in_time, 1);
//! assert_eq!(stats.timeouts_reported, 1);
//! # Ok(())
//! # }
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod ack_set;
pub mod coordinator;
pub mod error;
pub mod handle;
pub mod item;
pub mod policy;
pub mod reporter;
pub mod stats;

pub mod prelude;

pub use coordinator::{ShutdownMode, WatchdogCoordinator};
pub use error::{WatchdogError, WatchdogResult};
pub use handle::WatchdogHandle;
pub use item::{TimeoutReport, WorkItem};
pub use policy::{TimeoutPolicy, TimeoutPolicyBuilder};
pub use reporter::{Reporter, TracingReporter};
pub use stats::CoordinatorStats;
