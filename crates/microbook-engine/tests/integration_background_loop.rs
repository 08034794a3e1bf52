//! Integration test: the spawned matching loop and concurrent callers.

use std::sync::Arc;
use std::time::Duration;

use microbook_engine::MatchingEngine;
use microbook_types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn fast_engine() -> Arc<MatchingEngine> {
    let config = EngineConfig {
        max_idle_wait_ms: 5,
        error_backoff_ms: 5,
        ..EngineConfig::default()
    };
    Arc::new(MatchingEngine::with_config(config).unwrap())
}

/// Poll until the book is uncrossed, giving up after a few seconds.
async fn settle(engine: &MatchingEngine) -> BookSnapshot {
    for _ in 0..1000 {
        let snap = engine.snapshot().unwrap();
        if !snap.is_crossed() {
            return snap;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("matching loop did not uncross the book");
}

fn assert_well_formed(snap: &BookSnapshot) {
    assert!(snap.bids.iter().chain(&snap.asks).all(|o| o.amount > Decimal::ZERO));
    assert!(snap.bids.windows(2).all(|w| {
        w[0].price > w[1].price || (w[0].price == w[1].price && w[0].id < w[1].id)
    }));
    assert!(snap.asks.windows(2).all(|w| {
        w[0].price < w[1].price || (w[0].price == w[1].price && w[0].id < w[1].id)
    }));
    assert!(!snap.is_crossed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn background_loop_clears_a_cross() {
    let engine = fast_engine();
    let matcher = engine.spawn_matcher();

    engine.submit_limit(dec(10), dec(55), Side::Bid).unwrap();
    engine.submit_limit(dec(10), dec(50), Side::Ask).unwrap();

    let snap = settle(&engine).await;
    assert!(snap.is_empty());
    let fills: Vec<String> = engine
        .recent_log_with(10, LogOrder::OldestFirst)
        .unwrap()
        .into_iter()
        .filter(|l| l.ends_with("got filled."))
        .collect();
    assert_eq!(fills.len(), 2);

    matcher.abort();
}

#[tokio::test]
async fn loop_runs_on_a_current_thread_runtime() {
    let engine = fast_engine();
    let matcher = engine.spawn_matcher();

    engine.submit_limit(dec(7), dec(20), Side::Ask).unwrap();
    engine.submit_limit(dec(10), dec(21), Side::Bid).unwrap();

    let snap = settle(&engine).await;
    assert!(snap.asks.is_empty());
    assert_eq!(snap.bids[0].amount, dec(3));
    assert_eq!(snap.bids[0].price, dec(21));

    matcher.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn loop_survives_idle_periods() {
    let engine = fast_engine();
    let matcher = engine.spawn_matcher();

    // Several idle timeouts pass with nothing to do.
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!matcher.is_finished());

    engine.submit_limit(dec(1), dec(5), Side::Ask).unwrap();
    engine.submit_limit(dec(1), dec(5), Side::Bid).unwrap();
    assert!(settle(&engine).await.is_empty());

    matcher.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_with_running_loop() {
    let engine = fast_engine();
    let matcher = engine.spawn_matcher();

    let mut workers = Vec::new();
    for seed in 0..4u64 {
        let engine = Arc::clone(&engine);
        workers.push(tokio::task::spawn_blocking(move || {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut accepted = 0usize;
            for _ in 0..250 {
                match rng.gen_range(0..10) {
                    0..=3 => {
                        engine
                            .submit_limit(
                                dec(rng.gen_range(1..=10)),
                                dec(rng.gen_range(1..=12)),
                                Side::Bid,
                            )
                            .unwrap();
                        accepted += 1;
                    }
                    4..=7 => {
                        engine
                            .submit_limit(
                                dec(rng.gen_range(1..=10)),
                                dec(rng.gen_range(8..=20)),
                                Side::Ask,
                            )
                            .unwrap();
                        accepted += 1;
                    }
                    8 => {
                        engine
                            .submit_market(dec(rng.gen_range(0..=15)), Direction::Buy)
                            .unwrap();
                    }
                    _ => {
                        let snap = engine.snapshot().unwrap();
                        let mut resting = snap.bids.iter().chain(&snap.asks);
                        assert!(resting.all(|o| o.amount > Decimal::ZERO));
                    }
                }
            }
            accepted
        }));
    }

    let mut accepted = 0;
    for worker in workers {
        accepted += worker.await.unwrap();
    }

    let snap = settle(&engine).await;
    assert_well_formed(&snap);

    // Every accepted order got a distinct id from one sequence.
    let added = engine
        .recent_log_with(usize::MAX, LogOrder::OldestFirst)
        .unwrap()
        .into_iter()
        .filter(|l| l.contains(" added for "))
        .count();
    assert_eq!(added, accepted);
    let mut ids: Vec<OrderId> = snap.bids.iter().chain(&snap.asks).map(|o| o.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), snap.bids.len() + snap.asks.len());
    assert!(ids.iter().all(|id| usize::try_from(id.get()).unwrap() <= accepted));

    matcher.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn market_orders_race_the_loop_without_losing_volume() {
    let engine = fast_engine();
    let matcher = engine.spawn_matcher();

    for _ in 0..50 {
        engine.submit_limit(dec(2), dec(10), Side::Ask).unwrap();
    }
    let mut bought = Decimal::ZERO;
    for _ in 0..20 {
        let outcome = engine.submit_market(dec(3), Direction::Buy).unwrap();
        let legs: Decimal = outcome.legs().iter().map(|l| l.amount).sum();
        assert_eq!(legs + outcome.remaining(), dec(3));
        bought += outcome.executed();
    }

    let snap = settle(&engine).await;
    assert_eq!(bought, dec(60));
    assert_eq!(snap.ask_volume(), dec(40));

    matcher.abort();
}
