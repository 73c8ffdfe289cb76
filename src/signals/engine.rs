//! Public entry point: price series in, explained signal out.

use crate::config::EngineConfig;
use crate::error::SignalError;
use crate::indicators::IndicatorCalculator;
use crate::metrics::Metrics;
use crate::models::price::{PriceBar, PriceSeries};
use crate::models::signal::{Action, Signal};
use crate::predictor::{DirectionalPredictor, SequencePredictor};
use crate::signals::explanation::ExplanationGenerator;
use crate::signals::fusion::FusionEngine;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Composes indicators, the sequence predictor, fusion and explanation.
///
/// Holds no mutable state; one engine can serve concurrent evaluations.
pub struct SignalEngine {
    config: EngineConfig,
    calculator: IndicatorCalculator,
    predictor: Arc<dyn DirectionalPredictor>,
    fusion: FusionEngine,
    metrics: Option<Arc<Metrics>>,
}

impl SignalEngine {
    pub fn new(
        config: EngineConfig,
        predictor: Arc<dyn DirectionalPredictor>,
    ) -> Result<Self, SignalError> {
        config.validate()?;
        let calculator = IndicatorCalculator::new(config.indicators.clone())?;
        let fusion = FusionEngine::new(config.fusion.clone())?;
        Ok(Self {
            config,
            calculator,
            predictor,
            fusion,
            metrics: None,
        })
    }

    /// Engine backed by the LSTM artifact at `config.predictor.model_path`,
    /// or running indicator-only when none is configured or it fails to load.
    pub fn from_config(config: EngineConfig) -> Result<Self, SignalError> {
        let predictor = SequencePredictor::from_config(config.predictor.clone());
        Self::new(config, Arc::new(predictor))
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Bars a series must contain to be evaluated.
    pub fn required_history(&self) -> usize {
        self.calculator.required_history()
    }

    /// Validate raw bars, then evaluate them.
    pub async fn evaluate_bars(&self, coin: &str, bars: Vec<PriceBar>) -> Result<Signal, SignalError> {
        match PriceSeries::new(bars) {
            Ok(series) => self.evaluate(coin, &series).await,
            Err(e) => {
                self.record_error(coin, &e);
                Err(e)
            }
        }
    }

    /// Evaluate one coin at the latest bar of `series`.
    ///
    /// Fails only when the indicators cannot be computed; predictor trouble
    /// degrades to an indicator-only decision.
    pub async fn evaluate(&self, coin: &str, series: &PriceSeries) -> Result<Signal, SignalError> {
        let guard = self.metrics.as_ref().map(|m| m.track_evaluation());
        let result = self.evaluate_inner(coin, series).await;
        drop(guard);

        match result {
            Ok(signal) => {
                if let Some(ref metrics) = self.metrics {
                    metrics
                        .signal_evaluations_total
                        .with_label_values(&[signal.action.as_str()])
                        .inc();
                }
                Ok(signal)
            }
            Err(e) => {
                self.record_error(coin, &e);
                Err(e)
            }
        }
    }

    async fn evaluate_inner(&self, coin: &str, series: &PriceSeries) -> Result<Signal, SignalError> {
        debug!(coin = %coin, bars = series.len(), "evaluating signal");

        let indicators = self.calculator.compute(series)?;
        let prediction = self.predictor.predict(&series.closes()).await;

        if let Some(reason) = prediction.degradation() {
            warn!(
                coin = %coin,
                reason = %reason,
                "sequence predictor unavailable, using indicators only"
            );
            if let Some(ref metrics) = self.metrics {
                metrics
                    .predictor_degraded_total
                    .with_label_values(&[reason.label()])
                    .inc();
            }
        }

        let outcome = self.fusion.fuse(&indicators, &prediction);
        let explanation = ExplanationGenerator::generate(&outcome.trace, outcome.action);
        let latest = series.latest();

        let confidence_pct = (outcome.confidence * 10000.0).round() / 100.0;
        if outcome.action == Action::Hold {
            debug!(
                coin = %coin,
                action = %outcome.action,
                confidence = confidence_pct,
                score = outcome.trace.score,
                "signal evaluated for {}: HOLD ({:.2}%)",
                coin,
                confidence_pct
            );
        } else {
            info!(
                coin = %coin,
                action = %outcome.action,
                confidence = confidence_pct,
                score = outcome.trace.score,
                degraded = outcome.trace.is_degraded(),
                "signal evaluated for {}: {} ({:.2}%)",
                coin,
                outcome.action,
                confidence_pct
            );
        }

        Ok(Signal {
            coin: coin.to_string(),
            evaluated_at: latest.timestamp,
            price: latest.close,
            action: outcome.action,
            confidence: outcome.confidence,
            indicators,
            prediction,
            trace: outcome.trace,
            explanation,
        })
    }

    fn record_error(&self, coin: &str, error: &SignalError) {
        warn!(coin = %coin, error = %error, "signal evaluation rejected");
        if let Some(ref metrics) = self.metrics {
            metrics
                .signal_evaluation_errors_total
                .with_label_values(&[error.kind()])
                .inc();
        }
    }
}
