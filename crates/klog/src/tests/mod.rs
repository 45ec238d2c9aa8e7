// Unit tests for LogCore and the ring buffer behind it.
//
// Each test builds a local `LogCore` so the global instance used by the
// macros is never touched.

extern crate alloc;

use crate::LogLevel;
use crate::log_core::LogCore;

/// Test-only logging helper (mirrors production macro behavior, but targets a local `LogCore`).
macro_rules! test_log {
    ($logger:expr, $level:expr, $($arg:tt)*) => {
        $logger._log($level, format_args!($($arg)*))
    };
}

mod basic;
