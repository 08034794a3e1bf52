//! System-wide constants for the MicroBook matching engine.

/// Upper bound on how long the matching loop sleeps without a wake-up
/// notification before re-checking the book (milliseconds).
pub const DEFAULT_MAX_IDLE_WAIT_MS: u64 = 50;

/// Back-off after a failed matching iteration (milliseconds).
pub const DEFAULT_ERROR_BACKOFF_MS: u64 = 100;

/// Default number of audit entries returned by `recent_log`.
pub const DEFAULT_RECENT_LOG_LIMIT: usize = 100;

/// Default `tracing` level for the binary when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Timestamp layout used when rendering audit entries.
pub const AUDIT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "MicroBook";
