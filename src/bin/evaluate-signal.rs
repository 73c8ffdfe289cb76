//! Evaluate a hybrid signal for a price series stored as JSON.
//!
//! Usage: `evaluate-signal <series.json> [coin]`
//!
//! The file holds an array of bars:
//! `[{"timestamp": "2024-01-01T00:00:00Z", "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0, "volume": 0.0}, ...]`.
//! Configuration comes from the environment (see `EngineConfig::from_env`);
//! set `MODEL_PATH` to enable the sequence model.

use dotenvy::dotenv;
use hybrid_signal::config::{get_environment, EngineConfig};
use hybrid_signal::logging;
use hybrid_signal::metrics::Metrics;
use hybrid_signal::models::PriceBar;
use hybrid_signal::SignalEngine;
use std::env;
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or("usage: evaluate-signal <series.json> [coin]")?;
    let coin = args.next().unwrap_or_else(|| "bitcoin".to_string());

    info!(environment = %get_environment(), "Starting signal evaluation");

    let config = EngineConfig::from_env()?;
    let metrics = Arc::new(Metrics::new()?);
    let engine = SignalEngine::from_config(config)?.with_metrics(metrics.clone());

    let raw = std::fs::read_to_string(&path)?;
    let bars: Vec<PriceBar> = serde_json::from_str(&raw)?;
    info!(
        path = %path,
        coin = %coin,
        bars = bars.len(),
        required = engine.required_history(),
        "Loaded price series"
    );

    let signal = engine.evaluate_bars(&coin, bars).await?;
    println!("{}", serde_json::to_string_pretty(&signal)?);

    debug!(metrics = %metrics.export()?, "evaluation metrics");
    Ok(())
}
