//! # ackwatch-ring
//!
//! Growable FIFO ring buffer used by the ackwatch coordinator to hold pending
//! work items in arrival order.
//!
//! The buffer keeps one slot empty to tell "empty" apart from "full". Instead
//! of rejecting a push when it fills up, it doubles its storage and lays the
//! logical contents out again from index 0, so insertion order survives every
//! growth event.
//!
//! ## Complexity
//!
//! - [`GrowableRingBuffer::push`] - amortized O(1)
//! - [`GrowableRingBuffer::pop`] / [`GrowableRingBuffer::peek`] - O(1)
//! - [`GrowableRingBuffer::push_unique`] - O(n) in the current length
//!
//! ## Threading
//!
//! The buffer is not synchronized. In a multithreaded program a single owner
//! must serialize all access; the coordinator loop is that owner in ackwatch.
//!
//! ## Example
//!
//! ```rust
//! use ackwatch_ring::GrowableRingBuffer;
//!
//! let mut ring = GrowableRingBuffer::with_capacity(2);
//! ring.push("a");
//! ring.push("b");
//! ring.push("c"); // grows instead of failing
//!
//! assert_eq!(ring.len(), 3);
//! assert_eq!(ring.peek(), Some(&"a"));
//! assert_eq!(ring.pop(), Some("a"));
//! assert_eq!(ring.peek_all().copied().collect::<Vec<_>>(), vec!["b", "c"]);
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod ring_buffer;

pub use ring_buffer::{DEFAULT_CAPACITY, GrowableRingBuffer, Iter};
