//! Logging setup shared by billing hosts.

/// Initialize process-wide logging with the default filter (`info`).
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{DEFAULT_FILTER, LOG_FORMAT_ENV, LogFormat};
