//! The shared engine instance.
//!
//! All mutable state (both book sides, the id sequence and the audit log)
//! sits in one [`EngineState`] behind a single `std::sync::Mutex`. Every
//! operation holds the guard for exactly one unit of work: one insertion,
//! one market walk, one crossing step or one snapshot. The guard is never
//! held across an `.await`.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use microbook_matchcore::{CrossStatus, OrderBook, execute_market, resolve_cross};
use microbook_types::{
    AuditEvent, BookSnapshot, Direction, EngineConfig, LimitAck, LimitOrder, LimitOrderRequest,
    LogOrder, MarketOrder, MarketOrderRequest, MarketOutcome, MicrobookError, Order, OrderId,
    RestingOrder, Result, Side,
};
use rust_decimal::Decimal;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::AuditLog;
use crate::matching_loop;

/// Everything guarded by the engine lock.
#[derive(Debug)]
struct EngineState {
    book: OrderBook,
    next_id: OrderId,
    log: AuditLog,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            book: OrderBook::new(),
            next_id: OrderId::FIRST,
            log: AuditLog::new(),
        }
    }
}

/// Single-instrument matching engine.
///
/// Share it behind an `Arc`; all operations take `&self` and block only
/// for the length of one critical section.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    state: Mutex<EngineState>,
    wake: Notify,
    config: EngineConfig,
}

impl MatchingEngine {
    /// Engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom configuration.
    ///
    /// # Errors
    /// `Configuration` when [`EngineConfig::validate`] rejects `config`.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(EngineState::default()),
            wake: Notify::new(),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =================================================================
    // Submission
    // =================================================================

    /// Validate and rest a limit order.
    ///
    /// The order is not matched here: a crossing order stays in the book
    /// until the matching loop resolves it.
    ///
    /// # Errors
    /// `InvalidOrder` (state untouched) or `Internal` if the lock is poisoned.
    pub fn submit_limit(&self, amount: Decimal, price: Decimal, side: Side) -> Result<LimitAck> {
        let terms = LimitOrder::new(amount, price, side).inspect_err(|err| {
            tracing::warn!(%amount, %price, %side, error = %err, "Limit order rejected");
        })?;
        self.place_limit(terms)
    }

    /// [`Self::submit_limit`] for a loosely-typed request (`type` = `"bid"`/`"ask"`).
    pub fn submit_limit_request(&self, request: &LimitOrderRequest) -> Result<LimitAck> {
        let terms = request.validate().inspect_err(|err| {
            tracing::warn!(?request, error = %err, "Limit order rejected");
        })?;
        self.place_limit(terms)
    }

    /// Execute a market order against the opposing side.
    ///
    /// Running out of liquidity is reported as
    /// [`MarketOutcome::PartiallyFilled`], not as an error.
    pub fn submit_market(&self, amount: Decimal, direction: Direction) -> Result<MarketOutcome> {
        let order = MarketOrder::new(amount, direction).inspect_err(|err| {
            tracing::warn!(%amount, %direction, error = %err, "Market order rejected");
        })?;
        self.place_market(order)
    }

    /// [`Self::submit_market`] for a loosely-typed request (`type` = `"buy"`/`"sell"`).
    pub fn submit_market_request(&self, request: &MarketOrderRequest) -> Result<MarketOutcome> {
        let order = request.validate().inspect_err(|err| {
            tracing::warn!(?request, error = %err, "Market order rejected");
        })?;
        self.place_market(order)
    }

    fn place_limit(&self, terms: LimitOrder) -> Result<LimitAck> {
        let ack = {
            let mut state = self.lock()?;
            let order = Order::new(state.next_id, terms);
            let ack = LimitAck {
                id: order.id,
                side: order.side,
                amount: order.amount,
                price: order.price,
            };
            state.book.insert_order(order)?;
            state.next_id = ack.id.next();
            state.log.append(AuditEvent::OrderAdded {
                id: ack.id,
                side: ack.side,
                amount: ack.amount,
                price: ack.price,
            });
            ack
        };
        self.wake.notify_one();

        tracing::info!(
            order_id = %ack.id,
            side = %ack.side,
            amount = %ack.amount,
            price = %ack.price,
            "Limit order accepted"
        );
        Ok(ack)
    }

    fn place_market(&self, order: MarketOrder) -> Result<MarketOutcome> {
        let outcome = {
            let mut state = self.lock()?;
            let outcome = execute_market(&mut state.book, order);
            for leg in outcome.legs() {
                state.log.append(AuditEvent::MarketExecuted {
                    direction: order.direction,
                    amount: leg.amount,
                    price: leg.price,
                    resting_id: leg.resting_id,
                });
            }
            outcome
        };
        self.wake.notify_one();

        tracing::info!(
            direction = %order.direction,
            requested = %order.amount,
            executed = %outcome.executed(),
            remaining = %outcome.remaining(),
            legs = outcome.legs().len(),
            "Market order executed"
        );
        Ok(outcome)
    }

    // =================================================================
    // Reads
    // =================================================================

    /// Consistent view of both sides, best first.
    pub fn snapshot(&self) -> Result<BookSnapshot> {
        Ok(self.lock()?.book.snapshot())
    }

    /// The last `n` audit entries, ordered per [`EngineConfig::log_order`].
    pub fn recent_log(&self, n: usize) -> Result<Vec<String>> {
        self.recent_log_with(n, self.config.log_order)
    }

    pub fn recent_log_with(&self, n: usize, order: LogOrder) -> Result<Vec<String>> {
        Ok(self.lock()?.log.recent(n, order))
    }

    /// Total number of audit entries so far.
    pub fn log_len(&self) -> Result<usize> {
        Ok(self.lock()?.log.len())
    }

    pub fn best_bid(&self) -> Result<Option<RestingOrder>> {
        Ok(self.lock()?.book.best_bid().map(RestingOrder::from))
    }

    pub fn best_ask(&self) -> Result<Option<RestingOrder>> {
        Ok(self.lock()?.book.best_ask().map(RestingOrder::from))
    }

    pub fn spread(&self) -> Result<Option<Decimal>> {
        Ok(self.lock()?.book.spread())
    }

    // =================================================================
    // Matching
    // =================================================================

    /// Resolve at most one crossed pair, logging a fill for every order
    /// it consumes (bid before ask when both go).
    ///
    /// # Errors
    /// `Internal` if the lock is poisoned or an exhausted order sits at the
    /// top of the book.
    pub fn match_once(&self) -> Result<CrossStatus> {
        let mut state = self.lock()?;
        let state = &mut *state;

        for order in [state.book.best_bid(), state.book.best_ask()]
            .into_iter()
            .flatten()
        {
            if order.is_exhausted() {
                return Err(MicrobookError::Internal(format!(
                    "resting order {order} has non-positive amount"
                )));
            }
        }

        let status = resolve_cross(&mut state.book);
        if let CrossStatus::Matched(resolution) = &status {
            for order in resolution.filled() {
                state.log.append(AuditEvent::OrderFilled { order });
            }
        }
        Ok(status)
    }

    /// Call [`Self::match_once`] until the book is uncrossed. Returns the
    /// number of pairs resolved.
    pub fn run_to_quiescence(&self) -> Result<usize> {
        let mut resolved = 0;
        while let CrossStatus::Matched(_) = self.match_once()? {
            resolved += 1;
        }
        Ok(resolved)
    }

    /// Start the background matching loop on the current tokio runtime.
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn spawn_matcher(self: &Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(matching_loop::run(Arc::clone(self)))
    }

    /// One matching-loop pass. Every failure, panics included, comes back
    /// as `EngineIteration`. Clears the poison flag so callers and later
    /// passes can proceed.
    pub(crate) fn iterate(&self) -> Result<CrossStatus> {
        let result = match panic::catch_unwind(AssertUnwindSafe(|| self.match_once())) {
            Ok(Ok(status)) => Ok(status),
            Ok(Err(MicrobookError::Internal(reason))) => {
                Err(MicrobookError::EngineIteration { reason })
            }
            Ok(Err(err)) => Err(MicrobookError::EngineIteration {
                reason: err.to_string(),
            }),
            Err(payload) => Err(MicrobookError::EngineIteration {
                reason: panic_message(payload.as_ref()),
            }),
        };
        if self.state.is_poisoned() {
            self.state.clear_poison();
        }
        result
    }

    /// Wait for a submission notification or `max_wait`, whichever first.
    pub(crate) async fn wait_for_work(&self, max_wait: Duration) {
        // Elapsed timeout is the normal idle path.
        let _ = tokio::time::timeout(max_wait, self.wake.notified()).await;
    }

    fn lock(&self) -> Result<MutexGuard<'_, EngineState>> {
        self.state
            .lock()
            .map_err(|_| MicrobookError::Internal("engine state lock poisoned".to_string()))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panic: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panic: {msg}")
    } else {
        "panic with non-string payload".to_string()
    }
}
