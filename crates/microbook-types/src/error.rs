//! Error types for the MicroBook matching engine.
//!
//! All errors use the `MB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 5xx: Matching errors
//! - 9xx: General / internal errors
//!
//! A partially filled market order is **not** an error; it is reported as
//! [`crate::MarketOutcome::PartiallyFilled`].

use thiserror::Error;

/// Why an order was rejected at the boundary.
///
/// Callers match on the variant to tell the cases apart; the `Display`
/// text is meant for humans.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidOrderReason {
    /// A required field (`amount`, `price`, `type`) was absent.
    #[error("missing required parameter: {field}")]
    MissingParameter { field: &'static str },

    /// Limit order amount was zero or negative.
    #[error("amount must be positive")]
    NonPositiveAmount,

    /// Market order amount was negative (zero is accepted as a no-op).
    #[error("amount must not be negative")]
    NegativeAmount,

    /// Limit order price was zero or negative.
    #[error("price must be positive")]
    NonPositivePrice,

    /// Limit order side was not `bid` or `ask`.
    #[error("type must be either 'bid' or 'ask', got '{value}'")]
    InvalidSide { value: String },

    /// Market order direction was not `buy` or `sell`.
    #[error("type must be either 'buy' or 'sell', got '{value}'")]
    InvalidDirection { value: String },
}

/// Central error enum for all MicroBook operations.
#[derive(Debug, Error)]
pub enum MicrobookError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The order failed validation. Nothing was mutated.
    #[error("MB_ERR_101: Invalid order: {0}")]
    InvalidOrder(#[from] InvalidOrderReason),

    // =================================================================
    // Matching Errors (5xx)
    // =================================================================
    /// One pass of the background matching loop failed. Logged by the
    /// loop and never handed to callers.
    #[error("MB_ERR_500: Matching iteration failed: {reason}")]
    EngineIteration { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Internal error (e.g. engine state lock poisoned).
    #[error("MB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("MB_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, bad values, etc.).
    #[error("MB_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("MB_ERR_903: I/O error: {0}")]
    Io(String),
}

impl MicrobookError {
    /// The rejection reason, if this is an [`MicrobookError::InvalidOrder`].
    #[must_use]
    pub fn invalid_reason(&self) -> Option<&InvalidOrderReason> {
        match self {
            Self::InvalidOrder(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MicrobookError>;

impl From<std::io::Error> for MicrobookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MicrobookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
