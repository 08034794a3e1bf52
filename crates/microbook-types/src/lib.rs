//! # microbook-types
//!
//! Shared types, errors, and configuration for the **MicroBook** matching engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`]
//! - **Order model**: [`Order`], [`LimitOrder`], [`MarketOrder`], [`Side`], [`Direction`]
//! - **Execution model**: [`Fill`], [`LimitAck`], [`MarketOutcome`]
//! - **Boundary requests**: [`LimitOrderRequest`], [`MarketOrderRequest`]
//! - **Views**: [`BookSnapshot`], [`RestingOrder`]
//! - **Audit trail**: [`AuditEvent`], [`AuditEntry`], [`LogOrder`]
//! - **Configuration**: [`EngineConfig`], [`LoggingConfig`]
//! - **Errors**: [`MicrobookError`] with `MB_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod audit;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;
pub mod outcome;
pub mod request;
pub mod snapshot;

// Re-export all primary types at crate root for ergonomic imports:
//   use microbook_types::{Order, Side, Fill, MarketOutcome, ...};

pub use audit::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use outcome::*;
pub use request::*;
pub use snapshot::*;

// Constants are accessed via `microbook_types::constants::FOO`
// (not re-exported to avoid name collisions).
