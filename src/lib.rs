//! Hybrid signal engine: technical indicators fused with a sequence-model
//! forecast into an explained BUY/SELL/HOLD recommendation.

pub mod common;
pub mod config;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod predictor;
pub mod signals;

pub use config::EngineConfig;
pub use error::SignalError;
pub use models::{Action, PriceBar, PriceSeries, Signal};
pub use signals::engine::SignalEngine;
