//! # microbook-engine
//!
//! The concurrent shell around [`microbook_matchcore`]:
//!
//! - [`MatchingEngine`]: owns the book, the id sequence and the audit log
//!   behind one lock, and exposes blocking submit/query operations
//! - [`AuditLog`]: append-only, timestamped record of additions and fills
//! - the background matching loop, started with
//!   [`MatchingEngine::spawn_matcher`], which resolves crossed pairs one
//!   at a time until the book is uncrossed
//!
//! ```text
//! callers ──submit_limit──▶ ┌──────────────────────┐
//!         ──submit_market─▶ │ Mutex<EngineState>   │ ◀── matching loop
//!         ──snapshot──────▶ │  book | next_id | log│     (woken by Notify,
//!                           └──────────────────────┘      bounded idle wait)
//! ```

pub mod audit_log;
pub mod engine;
mod matching_loop;

pub use audit_log::AuditLog;
pub use engine::MatchingEngine;
pub use microbook_matchcore::{CrossKind, CrossResolution, CrossStatus};
