#![deny(missing_docs)]
//! Shared logging utilities for the Contents Lenz workspace.
//!
//! This crate provides the `engine_*` logging macros used by the core, the
//! engine and the terminal shell, plus a minimal test initializer for the
//! global logger.

use std::sync::atomic::{AtomicU64, Ordering};

static LAST_REQUEST_ID: AtomicU64 = AtomicU64::new(0);

/// Records the id of the most recently dispatched request.
///
/// The shell calls this whenever it hands an outbound operation to the
/// engine, so that log lines written far from the dispatch site can still be
/// correlated with the request that caused them.
pub fn note_request_id(id: u64) {
    LAST_REQUEST_ID.store(id, Ordering::Relaxed);
}

/// Returns the id recorded by [`note_request_id`], or 0 if none was recorded.
pub fn last_request_id() -> u64 {
    LAST_REQUEST_ID.load(Ordering::Relaxed)
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Never,
    )]);
}
