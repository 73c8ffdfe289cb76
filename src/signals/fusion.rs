//! Weighted voting across indicator and predictor signals.

use crate::config::FusionConfig;
use crate::error::SignalError;
use crate::models::indicators::IndicatorSnapshot;
use crate::models::prediction::Prediction;
use crate::models::signal::Action;
use crate::signals::trace::{DecisionRule, DecisionTrace, TraceEntry};
use crate::signals::votes::Vote;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct FusionOutcome {
    pub action: Action,
    pub confidence: f64,
    pub trace: DecisionTrace,
}

/// Fuses an indicator snapshot and a prediction into one action.
///
/// The three indicators always participate, so their weights always count
/// toward the normalizing denominator even when they vote zero. The
/// predictor participates only when its prediction is available; otherwise
/// its weight is left out and the score re-normalizes over the indicators.
#[derive(Debug, Clone)]
pub struct FusionEngine {
    config: FusionConfig,
}

impl FusionEngine {
    pub fn new(config: FusionConfig) -> Result<Self, SignalError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn fuse(&self, snapshot: &IndicatorSnapshot, prediction: &Prediction) -> FusionOutcome {
        let weights = &self.config.weights;

        let mut entries = vec![
            TraceEntry::new(
                Vote::rsi(
                    &snapshot.rsi,
                    self.config.rsi_oversold,
                    self.config.rsi_overbought,
                ),
                weights.rsi,
            ),
            TraceEntry::new(Vote::macd(&snapshot.macd, snapshot.price), weights.macd),
            TraceEntry::new(Vote::ma_cross(&snapshot.ma_cross), weights.ma_cross),
        ];

        let degraded = match prediction {
            Prediction::Available(forecast) => {
                entries.push(TraceEntry::new(Vote::predictor(forecast), weights.predictor));
                None
            }
            Prediction::Unavailable { reason } => Some(reason.clone()),
        };

        let weighted_sum: f64 = entries.iter().map(|e| e.contribution).sum();
        let denominator: f64 = entries.iter().map(|e| e.weight).sum();
        let score = if denominator > 0.0 {
            weighted_sum / denominator
        } else {
            0.0
        };

        let (action, rule) = decide(score, self.config.threshold);

        let trace = DecisionTrace {
            entries,
            weighted_sum,
            denominator,
            score,
            threshold: self.config.threshold,
            rule,
            degraded,
        };
        let confidence = trace.confidence();

        debug!(
            weighted_sum,
            denominator,
            score,
            action = %action,
            rule = ?rule,
            degraded = trace.is_degraded(),
            "fusion decision"
        );

        FusionOutcome {
            action,
            confidence,
            trace,
        }
    }
}

/// Strictly beyond the threshold is decisive; anything else holds.
pub fn decide(score: f64, threshold: f64) -> (Action, DecisionRule) {
    if score > threshold {
        (Action::Buy, DecisionRule::BuyThresholdExceeded)
    } else if score < -threshold {
        (Action::Sell, DecisionRule::SellThresholdExceeded)
    } else if score.abs() == threshold {
        (Action::Hold, DecisionRule::AtThreshold)
    } else {
        (Action::Hold, DecisionRule::WithinNeutralBand)
    }
}
