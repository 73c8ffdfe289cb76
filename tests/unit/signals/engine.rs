//! Unit tests for the evaluation engine

use crate::test_utils::{
    available, bars_from_closes, decelerating_decline, decelerating_rally, flat_closes,
    linear_closes, series_from_closes, timestamp, zero_weights, FixedPredictor, PendingPredictor,
};
use hybrid_signal::config::EngineConfig;
use hybrid_signal::error::SignalError;
use hybrid_signal::metrics::Metrics;
use hybrid_signal::models::{Action, DegradationReason, Direction, PriceBar, Prediction};
use hybrid_signal::predictor::SequencePredictor;
use hybrid_signal::signals::{DecisionRule, VoteSource};
use hybrid_signal::SignalEngine;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn engine_with(prediction: Prediction) -> (SignalEngine, Arc<FixedPredictor>) {
    let predictor = Arc::new(FixedPredictor::new(prediction));
    let engine = SignalEngine::new(EngineConfig::default(), predictor.clone()).unwrap();
    (engine, predictor)
}

fn indicator_only() -> SignalEngine {
    SignalEngine::from_config(EngineConfig::default()).unwrap()
}

#[tokio::test]
async fn test_flat_series_holds() {
    let engine = indicator_only();
    let signal = engine
        .evaluate("bitcoin", &series_from_closes(&flat_closes(60, 100.0)))
        .await
        .unwrap();

    assert_eq!(signal.coin, "bitcoin");
    assert_eq!(signal.action, Action::Hold);
    assert_eq!(signal.confidence, 0.0);
    assert_eq!(signal.price, 100.0);
    assert_eq!(signal.evaluated_at, timestamp(59));
    assert_eq!(signal.indicators.rsi.value, 50.0);
    assert!(!signal.indicators.ma_cross.just_crossed);
    assert_eq!(signal.prediction, Prediction::unavailable(DegradationReason::NoModel));
    assert_eq!(signal.explanation.len(), 3);
    assert!(signal.explanation[1].contains("are level"));
}

#[tokio::test]
async fn test_decelerating_decline_buys_in_degraded_mode() {
    let engine = indicator_only();
    let signal = engine
        .evaluate("ethereum", &series_from_closes(&decelerating_decline()))
        .await
        .unwrap();

    assert_eq!(signal.indicators.rsi.value, 0.0);
    assert_eq!(signal.action, Action::Buy);
    assert!((signal.confidence - 0.8).abs() < 1e-12);
    assert_eq!(signal.trace.denominator, 2.5);
    assert_eq!(signal.trace.entry(VoteSource::Macd).unwrap().contribution, 1.0);
    assert!(signal.trace.is_degraded());
}

#[tokio::test]
async fn test_decelerating_rally_sells() {
    let signal = indicator_only()
        .evaluate("solana", &series_from_closes(&decelerating_rally()))
        .await
        .unwrap();
    assert_eq!(signal.indicators.rsi.value, 100.0);
    assert_eq!(signal.action, Action::Sell);
    assert_eq!(signal.trace.rule, DecisionRule::SellThresholdExceeded);
}

#[tokio::test]
async fn test_predictor_vote_enters_fusion() {
    let (engine, predictor) = engine_with(available(Direction::Down, 0.0));
    let signal = engine
        .evaluate("bitcoin", &series_from_closes(&decelerating_decline()))
        .await
        .unwrap();

    assert_eq!(predictor.call_count(), 1);
    assert_eq!(signal.trace.denominator, 4.0);
    assert!((signal.trace.score - 0.125).abs() < 1e-12);
    assert_eq!(signal.action, Action::Hold);
    assert!(!signal.trace.is_degraded());
}

#[tokio::test]
async fn test_loaded_model_strengthens_signal() {
    let weights = zero_weights("price-lstm", 4, (0.8f64 / 0.2).ln());
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&serde_json::to_vec(&weights).unwrap()).unwrap();

    let mut config = EngineConfig::default();
    config.predictor.model_path = Some(file.path().to_path_buf());
    let engine = SignalEngine::from_config(config).unwrap();

    let signal = engine
        .evaluate("bitcoin", &series_from_closes(&decelerating_decline()))
        .await
        .unwrap();
    let forecast = signal.prediction.forecast().unwrap();
    assert_eq!(forecast.model, "price-lstm");
    assert_eq!(forecast.direction, Direction::Up);
    assert!((signal.trace.score - 0.725).abs() < 1e-9);
    assert_eq!(signal.action, Action::Buy);
    assert!(signal.explanation[0].contains("contribution +1.00"));
}

#[tokio::test]
async fn test_insufficient_history() {
    let (engine, predictor) = engine_with(available(Direction::Up, 0.9));
    assert_eq!(engine.required_history(), 51);

    let result = engine
        .evaluate("bitcoin", &series_from_closes(&linear_closes(50, 100.0, 1.0)))
        .await;
    assert_eq!(
        result,
        Err(SignalError::InsufficientHistory {
            required: 51,
            got: 50
        })
    );
    assert_eq!(predictor.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_bars_rejected() {
    let engine = indicator_only();

    let result = engine.evaluate_bars("bitcoin", Vec::new()).await;
    assert!(matches!(result, Err(SignalError::InvalidSeries { .. })));

    let mut bars = bars_from_closes(&flat_closes(60, 100.0));
    bars.swap(10, 11);
    let result = engine.evaluate_bars("bitcoin", bars).await;
    assert!(matches!(result, Err(SignalError::InvalidSeries { .. })));

    let mut bars = bars_from_closes(&flat_closes(60, 100.0));
    bars[30] = PriceBar::from_close(timestamp(30), -1.0);
    let result = engine.evaluate_bars("bitcoin", bars).await;
    assert!(matches!(result, Err(SignalError::InvalidSeries { .. })));
}

#[tokio::test]
async fn test_evaluate_bars_matches_evaluate() {
    let engine = indicator_only();
    let closes = decelerating_decline();
    let from_bars = engine
        .evaluate_bars("bitcoin", bars_from_closes(&closes))
        .await
        .unwrap();
    let from_series = engine
        .evaluate("bitcoin", &series_from_closes(&closes))
        .await
        .unwrap();
    assert_eq!(from_bars, from_series);
}

#[tokio::test]
async fn test_evaluate_is_idempotent() {
    let (engine, _) = engine_with(available(Direction::Up, 0.7));
    let series = series_from_closes(&linear_closes(80, 50.0, 0.4));
    let first = engine.evaluate("bitcoin", &series).await.unwrap();
    let second = engine.evaluate("bitcoin", &series).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_metrics_recorded() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let engine = SignalEngine::new(
        EngineConfig::default(),
        Arc::new(SequencePredictor::without_model(Default::default())),
    )
    .unwrap()
    .with_metrics(metrics.clone());

    engine
        .evaluate("bitcoin", &series_from_closes(&flat_closes(60, 100.0)))
        .await
        .unwrap();
    engine
        .evaluate("bitcoin", &series_from_closes(&decelerating_decline()))
        .await
        .unwrap();
    let _ = engine
        .evaluate("bitcoin", &series_from_closes(&flat_closes(10, 100.0)))
        .await;
    let _ = engine.evaluate_bars("bitcoin", Vec::new()).await;

    let evaluations = &metrics.signal_evaluations_total;
    assert_eq!(evaluations.with_label_values(&["HOLD"]).get(), 1);
    assert_eq!(evaluations.with_label_values(&["BUY"]).get(), 1);
    assert_eq!(
        metrics
            .predictor_degraded_total
            .with_label_values(&["no_model"])
            .get(),
        2
    );
    let errors = &metrics.signal_evaluation_errors_total;
    assert_eq!(errors.with_label_values(&["insufficient_history"]).get(), 1);
    assert_eq!(errors.with_label_values(&["invalid_series"]).get(), 1);
    assert_eq!(metrics.signal_evaluations_active.get(), 0);
    assert_eq!(metrics.signal_evaluation_duration_seconds.get_sample_count(), 3);
}

#[tokio::test]
async fn test_cancelled_evaluation_releases_active_gauge() {
    let metrics = Arc::new(Metrics::new().unwrap());
    let engine = SignalEngine::new(EngineConfig::default(), Arc::new(PendingPredictor))
        .unwrap()
        .with_metrics(metrics.clone());
    let series = series_from_closes(&flat_closes(60, 100.0));

    let result = tokio::time::timeout(
        Duration::from_millis(20),
        engine.evaluate("bitcoin", &series),
    )
    .await;
    assert!(result.is_err());

    assert_eq!(metrics.signal_evaluations_active.get(), 0);
    assert_eq!(metrics.signal_evaluation_duration_seconds.get_sample_count(), 1);
    assert_eq!(
        metrics
            .signal_evaluations_total
            .with_label_values(&["HOLD"])
            .get(),
        0
    );
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = EngineConfig::default();
    config.indicators.macd_fast = 30;
    assert!(matches!(
        SignalEngine::from_config(config),
        Err(SignalError::InvalidConfig(_))
    ));
}
