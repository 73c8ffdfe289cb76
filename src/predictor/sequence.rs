//! Predictor wrapper: windowing, normalization, bounded inference and
//! degradation to an unavailable prediction.

use crate::config::PredictorConfig;
use crate::models::prediction::{DegradationReason, Direction, Forecast, Prediction};
use crate::predictor::lstm::LstmModel;
use crate::predictor::model::{ModelHandle, SequenceModel};
use crate::predictor::normalization::Normalizer;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Anything that can turn a close-price history into a [`Prediction`].
///
/// Implementations never fail; problems are reported as
/// [`Prediction::Unavailable`].
#[async_trait]
pub trait DirectionalPredictor: Send + Sync {
    async fn predict(&self, closes: &[f64]) -> Prediction;
}

pub struct SequencePredictor {
    model: Option<ModelHandle>,
    config: PredictorConfig,
}

impl SequencePredictor {
    pub fn new(model: ModelHandle, config: PredictorConfig) -> Self {
        Self {
            model: Some(model),
            config,
        }
    }

    /// Predictor that always reports [`DegradationReason::NoModel`].
    pub fn without_model(config: PredictorConfig) -> Self {
        Self {
            model: None,
            config,
        }
    }

    /// Load the LSTM artifact named by `config.model_path`. A missing path or
    /// a load failure yields a predictor without a model.
    pub fn from_config(config: PredictorConfig) -> Self {
        let Some(path) = config.model_path.clone() else {
            info!("no model path configured, predictor runs in indicator-only mode");
            return Self::without_model(config);
        };

        match LstmModel::load(&path) {
            Ok(model) => {
                info!(
                    path = %path.display(),
                    model = %model.name(),
                    hidden_size = model.hidden_size(),
                    "sequence model loaded"
                );
                Self::new(Arc::new(model), config)
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to load sequence model, predictor runs in indicator-only mode"
                );
                Self::without_model(config)
            }
        }
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn classify(&self, probability: f64) -> Direction {
        Direction::from_probability(
            probability,
            self.config.up_threshold,
            self.config.down_threshold,
        )
    }

    async fn run(&self, closes: &[f64]) -> Result<Forecast, DegradationReason> {
        let model = self.model.clone().ok_or(DegradationReason::NoModel)?;

        let window_len = self.config.window;
        if closes.len() < window_len {
            return Err(DegradationReason::InsufficientWindow {
                required: window_len,
                got: closes.len(),
            });
        }

        let window = &closes[closes.len() - window_len..];
        let scaler = Normalizer::fit(self.config.normalization, window);
        let input = scaler.transform(window);

        let inference_model = model.clone();
        let task = tokio::task::spawn_blocking(move || {
            inference_model.predict_up_probability(&input)
        });

        let probability = match tokio::time::timeout(self.config.timeout(), task).await {
            Err(_) => {
                return Err(DegradationReason::Timeout {
                    after_ms: self.config.timeout_ms,
                })
            }
            Ok(Err(join_error)) => {
                return Err(DegradationReason::ModelFailure {
                    message: join_error.to_string(),
                })
            }
            Ok(Ok(Err(model_error))) => {
                return Err(DegradationReason::ModelFailure {
                    message: model_error.to_string(),
                })
            }
            Ok(Ok(Ok(p))) => p,
        };

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(DegradationReason::InvalidOutput { value: probability });
        }

        Ok(Forecast {
            direction: self.classify(probability),
            probability,
            horizon: self.config.horizon(),
            model: model.name().to_string(),
            model_version: model.version().to_string(),
            scaling: scaler,
        })
    }
}

#[async_trait]
impl DirectionalPredictor for SequencePredictor {
    async fn predict(&self, closes: &[f64]) -> Prediction {
        match self.run(closes).await {
            Ok(forecast) => {
                debug!(
                    direction = %forecast.direction,
                    probability = forecast.probability,
                    model = %forecast.model,
                    "sequence prediction"
                );
                Prediction::Available(forecast)
            }
            Err(reason) => {
                debug!(reason = %reason, "sequence prediction unavailable");
                Prediction::unavailable(reason)
            }
        }
    }
}
