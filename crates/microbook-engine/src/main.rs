//! MicroBook - process entry point.
//!
//! Usage: `microbook [config.json]`

use std::sync::Arc;

use microbook_engine::MatchingEngine;
use microbook_types::{Direction, EngineConfig, LoggingConfig, Result, Side, constants};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    init_tracing(&config.logging);

    tracing::info!(
        version = constants::VERSION,
        "Starting {} matching engine",
        constants::ENGINE_NAME
    );

    let engine = Arc::new(MatchingEngine::with_config(config)?);
    let matcher = engine.spawn_matcher();

    walkthrough(&engine)?;

    tracing::info!("Press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    matcher.abort();
    tracing::info!("Shutting down");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Rest one bid and one ask, hit each side with a market order, then
/// print the resulting book and audit trail.
fn walkthrough(engine: &MatchingEngine) -> Result<()> {
    let bid = engine.submit_limit(Decimal::new(100, 0), Decimal::new(50, 0), Side::Bid)?;
    tracing::info!(%bid, "Walkthrough");
    let ask = engine.submit_limit(Decimal::new(75, 0), Decimal::new(52, 0), Side::Ask)?;
    tracing::info!(%ask, "Walkthrough");

    let buy = engine.submit_market(Decimal::new(25, 0), Direction::Buy)?;
    tracing::info!(outcome = %buy, "Walkthrough");
    let sell = engine.submit_market(Decimal::new(30, 0), Direction::Sell)?;
    tracing::info!(outcome = %sell, "Walkthrough");

    let resolved = engine.run_to_quiescence()?;
    let snapshot = engine.snapshot()?;
    let rendered = serde_json::to_string(&snapshot)?;
    tracing::info!(
        resolved,
        snapshot = %rendered,
        spread = ?snapshot.spread(),
        "Book after walkthrough"
    );

    for line in engine.recent_log(engine.config().recent_log_limit)? {
        tracing::info!("{line}");
    }
    Ok(())
}
