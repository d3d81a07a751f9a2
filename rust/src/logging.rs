//! Logging macros for the calculator with verbosity level control.
//!
//! Nothing is emitted when verbosity is 0. Events go through `tracing`, so the
//! host decides where they end up (a Python host typically installs no
//! subscriber, which makes the macros free apart from the level check).
//! Verbosity levels:
//! - 0: SILENT
//! - 1: CHANGES (batch results, rejected inputs)
//! - 2: CHECKS (per-task scores, validation verdicts)
//! - 3: DEBUG (sub-score internals, graph traversal)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: batch outcomes, aggregated failures.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::tracing::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: per-task scores, dependency check verdicts.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::tracing::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: raw sub-scores, working-day counts.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::tracing::trace!($($arg)*);
        }
    };
}
