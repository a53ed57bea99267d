//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use ackwatch_test_helpers::prelude::*;
//! ```

pub use crate::must::must_some;
pub use crate::{assert_disjoint, assert_in_range};

#[cfg(feature = "recorder")]
pub use crate::recorder::Recorder;

/// Result type for tests that propagate errors with `?`.
pub type TestResult = Result<(), Box<dyn std::error::Error>>;
