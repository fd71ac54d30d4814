#![deny(missing_docs)]
//! Shared logging utilities for the bubble workspace.
//!
//! Every crate logs through the `bubble_*` macros so that records share the
//! [`TARGET`] target and can be filtered as one unit by the host logger.

/// Log target used by every `bubble_*` macro.
pub const TARGET: &str = "bubble";

/// Logs a trace-level message under the bubble target.
#[macro_export]
macro_rules! bubble_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the bubble target.
#[macro_export]
macro_rules! bubble_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the bubble target.
#[macro_export]
macro_rules! bubble_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the bubble target.
#[macro_export]
macro_rules! bubble_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the bubble target.
#[macro_export]
macro_rules! bubble_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Initializes a terminal logger for tests.
///
/// Safe to call from every test: a second initialization is ignored.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str(TARGET)
        .build();

    // Another test may have installed the logger already.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
