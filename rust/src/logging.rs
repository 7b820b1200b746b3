//! Logging macros for the simulation engine with verbosity level control.
//!
//! Messages are forwarded to the `log` facade so the host picks the backend.
//! Nothing is formatted when the verbosity gate is closed.
//! Verbosity levels:
//! - 0: SILENT (nothing)
//! - 1: CHANGES (phase and schedule outcomes)
//! - 2: CHECKS (validation and per-task decisions)
//! - 3: DEBUG (full forward/backward pass internals)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1), routed to `log::info!`.
///
/// Used for: phase layout, makespan, summary figures.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::log::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2), routed to `log::debug!`.
///
/// Used for: validation issues, phase membership, critical path membership.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::log::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3), routed to `log::trace!`.
///
/// Used for: edge relaxation and queue activity in the passes.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::log::trace!($($arg)*);
        }
    };
}
