/// Check a caller contract of the forwarding protocol.
///
/// Violations are programming errors. The check is compiled in for debug builds, and for
/// optimized builds when the `extreme_assertions` feature is enabled.
macro_rules! forwarding_assert {
    ($($arg:tt)*) => {
        if cfg!(any(debug_assertions, feature = "extreme_assertions")) {
            assert!($($arg)*);
        }
    };
}
