//! Configuration types for a MicroBook engine process.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{LogOrder, MicrobookError, Result, constants};

/// Tunables for the matching engine and its background loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest the matching loop waits for a wake-up before re-checking
    /// the book anyway.
    pub max_idle_wait_ms: u64,
    /// Pause after a failed matching iteration.
    pub error_backoff_ms: u64,
    /// Default number of entries returned by `recent_log`.
    pub recent_log_limit: usize,
    /// Default ordering of `recent_log` results.
    pub log_order: LogOrder,
    /// Process logging setup (used by the binary only).
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_idle_wait_ms: constants::DEFAULT_MAX_IDLE_WAIT_MS,
            error_backoff_ms: constants::DEFAULT_ERROR_BACKOFF_MS,
            recent_log_limit: constants::DEFAULT_RECENT_LOG_LIMIT,
            log_order: LogOrder::OldestFirst,
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON config file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// [`MicrobookError::Configuration`] on zero durations or limits.
    pub fn validate(&self) -> Result<()> {
        if self.max_idle_wait_ms == 0 {
            return Err(MicrobookError::Configuration(
                "max_idle_wait_ms must be > 0".to_string(),
            ));
        }
        if self.error_backoff_ms == 0 {
            return Err(MicrobookError::Configuration(
                "error_backoff_ms must be > 0".to_string(),
            ));
        }
        if self.recent_log_limit == 0 {
            return Err(MicrobookError::Configuration(
                "recent_log_limit must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn max_idle_wait(&self) -> Duration {
        Duration::from_millis(self.max_idle_wait_ms)
    }

    #[must_use]
    pub fn error_backoff(&self) -> Duration {
        Duration::from_millis(self.error_backoff_ms)
    }
}

/// Logging output for the `microbook` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `"info"`).
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: constants::DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}
