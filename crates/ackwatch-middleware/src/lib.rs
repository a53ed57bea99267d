//! # ackwatch-middleware
//!
//! Handler chain for inbound interactions, with timeout detection backed by
//! [`ackwatch_watchdog`].
//!
//! - [`interaction`] - Interactions and their closed set of payload kinds
//! - [`handler`] - The [`Handler`] trait and a closure adapter
//! - [`chain`] - Ordered dispatch with entry/exit logging and panic containment
//! - [`timeout_detection`] - Registers interactions with a watchdog
//!
//! ## Example
//!
//! ```rust
//! use ackwatch_middleware::prelude::*;
//! use ackwatch_watchdog::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut coordinator = WatchdogCoordinator::with_tracing_reporter(TimeoutPolicy::default())?;
//! let detector = TimeoutDetectionHandler::new(coordinator.start()?);
//!
//! let chain = HandlerChain::<()>::new()
//!     .with(detector.clone())
//!     .with(FnHandler::new("reply", |_: &Interaction, _: &()| Ok(Flow::Continue)));
//!
//! let ping = Interaction::new("token-1", 42, 7, PingData);
//! chain.dispatch(&ping, &()).await?;
//! detector.acknowledge("token-1").await?;
//!
//! let stats = coordinator.stop(ShutdownMode::Drain).await?;
//! assert_eq!(stats.acknowledged_in_time, 1);
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

pub mod chain;
pub mod error;
pub mod handler;
pub mod interaction;
pub mod timeout_detection;

pub mod prelude;

pub use chain::{Dispatch, HandlerChain};
pub use error::{MiddlewareError, MiddlewareResult};
pub use handler::{FnHandler, Flow, Handler};
pub use interaction::{Interaction, InteractionData, InteractionKind};
pub use timeout_detection::TimeoutDetectionHandler;
