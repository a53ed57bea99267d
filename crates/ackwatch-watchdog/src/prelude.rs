//! Prelude for ackwatch-watchdog.
//!
//! ```rust
//! use ackwatch_watchdog::prelude::*;
//!
//! let policy = TimeoutPolicy::default();
//! assert!(WatchdogCoordinator::new(policy, TracingReporter).is_ok());
//! ```

pub use crate::coordinator::{ShutdownMode, WatchdogCoordinator};
pub use crate::error::{WatchdogError, WatchdogResult};
pub use crate::handle::WatchdogHandle;
pub use crate::item::{TimeoutReport, WorkItem};
pub use crate::policy::{TimeoutPolicy, TimeoutPolicyBuilder};
pub use crate::reporter::{Reporter, TracingReporter};
pub use crate::stats::CoordinatorStats;
