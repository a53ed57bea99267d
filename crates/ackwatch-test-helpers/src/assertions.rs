//! Assertion macros for range and membership checks.

/// Assert that a value lies within a range.
///
/// ```rust
/// use ackwatch_test_helpers::assert_in_range;
/// use std::time::Duration;
///
/// assert_in_range!(Duration::from_millis(4050), Duration::from_secs(4)..=Duration::from_millis(4100));
/// ```
#[macro_export]
macro_rules! assert_in_range {
    ($value:expr, $range:expr $(,)?) => {
        let value = $value;
        let range = $range;
        if !range.contains(&value) {
            panic!("assertion failed: value {:?} is not in range {:?}", value, range);
        }
    };
    ($value:expr, $range:expr, $($arg:tt)+) => {
        let value = $value;
        let range = $range;
        if !range.contains(&value) {
            panic!("assertion failed: value {:?} is not in range {:?}: {}", value, range, format_args!($($arg)+));
        }
    };
}

/// Assert that no element of `right` appears in `left`.
///
/// ```rust
/// use ackwatch_test_helpers::assert_disjoint;
///
/// assert_disjoint!(&["a", "c"], &["b"]);
/// ```
#[macro_export]
macro_rules! assert_disjoint {
    ($left:expr, $right:expr $(,)?) => {
        let left = $left;
        let right = $right;
        for item in right.iter() {
            if left.iter().any(|candidate| candidate == item) {
                panic!(
                    "assertion failed: {:?} unexpectedly contains {:?}",
                    left, item
                );
            }
        }
    };
}
