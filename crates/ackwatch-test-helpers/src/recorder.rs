//! Thread-safe recorder for values seen by callbacks under test.
//!
//! Reporters and handlers run on background tasks. A `Recorder` is cloned
//! into the callback and read back from the test body.

use parking_lot::Mutex;
use std::sync::Arc;

/// Shared, append-only log of observed values.
///
/// ```rust
/// use ackwatch_test_helpers::Recorder;
///
/// let recorder = Recorder::new();
/// let sink = recorder.clone();
/// let callback = move |value: &str| sink.push(value.to_string());
///
/// callback("a");
/// callback("b");
/// assert_eq!(recorder.snapshot(), vec!["a", "b"]);
/// ```
#[derive(Debug)]
pub struct Recorder<T> {
    entries: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Recorder<T> {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append a value.
    pub fn push(&self, value: T) {
        self.entries.lock().push(value);
    }

    /// Number of recorded values.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<T: Clone> Recorder<T> {
    /// Copy of everything recorded so far, in recording order.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.lock().clone()
    }
}
