//! Unwrap helper for tests.
//!
//! `#[track_caller]` keeps the panic location at the call site.

/// Unwrap an `Option`, panicking with `msg` on `None`.
///
/// ```rust
/// use ackwatch_test_helpers::must_some;
///
/// assert_eq!(must_some(Some(7), "expected a value"), 7);
/// ```
///
/// # Panics
///
/// Panics if the option is `None`.
#[track_caller]
pub fn must_some<T>(option: Option<T>, msg: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: {msg}"),
    }
}
