//! Shared test utilities for ackwatch.
//!
//! # Modules
//!
//! - [`mod@must`] - `must_some`, an `Option` unwrap with a readable panic
//! - [`assertions`] - Assertion macros for range and membership checks
//! - [`recorder`] - Thread-safe sink for values observed by callbacks
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! ackwatch-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use ackwatch_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod assertions;
pub mod must;
pub mod prelude;

#[cfg(feature = "recorder")]
#[cfg_attr(docsrs, doc(cfg(feature = "recorder")))]
pub mod recorder;

pub use must::*;

#[cfg(feature = "recorder")]
pub use recorder::Recorder;
