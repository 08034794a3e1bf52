//! Background matching loop.
//!
//! ```text
//! loop:
//!     iterate()
//!       Matched -> yield, re-check immediately
//!       Idle    -> wait for a submission (bounded by max_idle_wait)
//!       Err     -> log, sleep error_backoff, continue
//! ```
//!
//! The loop never exits on its own; it ends when its task is aborted or
//! the runtime shuts down.

use std::sync::Arc;

use microbook_matchcore::CrossStatus;
use microbook_types::constants;

use crate::MatchingEngine;

pub(crate) async fn run(engine: Arc<MatchingEngine>) {
    let max_idle_wait = engine.config().max_idle_wait();
    let backoff = engine.config().error_backoff();

    tracing::info!(
        engine = constants::ENGINE_NAME,
        max_idle_wait_ms = engine.config().max_idle_wait_ms,
        error_backoff_ms = engine.config().error_backoff_ms,
        "Matching loop started"
    );

    loop {
        match engine.iterate() {
            Ok(CrossStatus::Matched(resolution)) => {
                tracing::debug!(%resolution, "Matching loop resolved a pair");
                tokio::task::yield_now().await;
            }
            Ok(CrossStatus::Idle) => engine.wait_for_work(max_idle_wait).await,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    backoff_ms = engine.config().error_backoff_ms,
                    "Matching iteration failed"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
