//! Engine configuration.
//!
//! Every tunable lives in a named, validated field. Defaults match the
//! conventional indicator periods; `EngineConfig::from_env` applies
//! environment overrides on top of them.

use crate::error::SignalError;
use crate::predictor::normalization::NormalizationMethod;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Deployment environment name, used to pick the log format.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ma_short: usize,
    pub ma_long: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ma_short: 20,
            ma_long: 50,
        }
    }
}

impl IndicatorConfig {
    /// Bars needed for an RSI value.
    pub fn rsi_required(&self) -> usize {
        self.rsi_period + 1
    }

    /// Bars needed for the latest and the previous histogram value.
    pub fn macd_required(&self) -> usize {
        self.macd_slow + self.macd_signal
    }

    /// Bars needed for both moving averages on the latest and previous bar.
    pub fn ma_cross_required(&self) -> usize {
        self.ma_long + 1
    }

    /// Longest warm-up across all indicators.
    pub fn required_history(&self) -> usize {
        self.rsi_required()
            .max(self.macd_required())
            .max(self.ma_cross_required())
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("ma_short", self.ma_short),
            ("ma_long", self.ma_long),
        ];
        for (name, period) in periods {
            if period == 0 {
                return Err(SignalError::InvalidConfig(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }
        if self.macd_fast >= self.macd_slow {
            return Err(SignalError::InvalidConfig(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        if self.ma_short >= self.ma_long {
            return Err(SignalError::InvalidConfig(format!(
                "ma_short ({}) must be shorter than ma_long ({})",
                self.ma_short, self.ma_long
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Number of trailing closes fed to the model.
    pub window: usize,
    pub horizon_secs: u64,
    /// Probability above which the forecast reads UP.
    pub up_threshold: f64,
    /// Probability below which the forecast reads DOWN.
    pub down_threshold: f64,
    pub normalization: NormalizationMethod,
    pub timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            window: 30,
            horizon_secs: 86_400,
            up_threshold: 0.55,
            down_threshold: 0.45,
            normalization: NormalizationMethod::MinMax,
            timeout_ms: 2_000,
            model_path: None,
        }
    }
}

impl PredictorConfig {
    pub fn horizon(&self) -> Duration {
        Duration::from_secs(self.horizon_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        if self.window < 2 {
            return Err(SignalError::InvalidConfig(
                "predictor window must be at least 2 bars".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(SignalError::InvalidConfig(
                "predictor timeout must be greater than zero".to_string(),
            ));
        }
        let in_unit = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
        if !in_unit(self.up_threshold) || !in_unit(self.down_threshold) {
            return Err(SignalError::InvalidConfig(
                "predictor thresholds must lie in [0, 1]".to_string(),
            ));
        }
        if self.down_threshold > self.up_threshold {
            return Err(SignalError::InvalidConfig(format!(
                "down_threshold ({}) must not exceed up_threshold ({})",
                self.down_threshold, self.up_threshold
            )));
        }
        Ok(())
    }
}

/// Per-source vote weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteWeights {
    pub rsi: f64,
    pub macd: f64,
    pub ma_cross: f64,
    pub predictor: f64,
}

impl Default for VoteWeights {
    fn default() -> Self {
        Self {
            rsi: 1.0,
            macd: 1.0,
            ma_cross: 0.5,
            predictor: 1.5,
        }
    }
}

impl VoteWeights {
    pub fn new(rsi: f64, macd: f64, ma_cross: f64, predictor: f64) -> Result<Self, SignalError> {
        let weights = Self {
            rsi,
            macd,
            ma_cross,
            predictor,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), SignalError> {
        let all = [self.rsi, self.macd, self.ma_cross, self.predictor];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SignalError::InvalidConfig(
                "All weights must be finite and non-negative".to_string(),
            ));
        }
        if self.rsi + self.macd + self.ma_cross <= 0.0 {
            return Err(SignalError::InvalidConfig(
                "At least one indicator weight must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub weights: VoteWeights,
    /// Decision threshold on the normalized score.
    pub threshold: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            weights: VoteWeights::default(),
            threshold: 0.5,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

impl FusionConfig {
    pub fn validate(&self) -> Result<(), SignalError> {
        self.weights.validate()?;
        if !self.threshold.is_finite() || !(0.0..1.0).contains(&self.threshold) {
            return Err(SignalError::InvalidConfig(format!(
                "threshold must lie in [0, 1), got {}",
                self.threshold
            )));
        }
        let band_ok = (0.0..=100.0).contains(&self.rsi_oversold)
            && (0.0..=100.0).contains(&self.rsi_overbought)
            && self.rsi_oversold < self.rsi_overbought;
        if !band_ok {
            return Err(SignalError::InvalidConfig(format!(
                "RSI band must satisfy 0 <= oversold < overbought <= 100, got {} / {}",
                self.rsi_oversold, self.rsi_overbought
            )));
        }
        Ok(())
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indicators: IndicatorConfig,
    pub predictor: PredictorConfig,
    pub fusion: FusionConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), SignalError> {
        self.indicators.validate()?;
        self.predictor.validate()?;
        self.fusion.validate()
    }

    /// Defaults overridden by environment variables, then validated.
    pub fn from_env() -> Result<Self, SignalError> {
        let mut config = Self::default();

        let ind = &mut config.indicators;
        override_from_env("RSI_PERIOD", &mut ind.rsi_period)?;
        override_from_env("MACD_FAST", &mut ind.macd_fast)?;
        override_from_env("MACD_SLOW", &mut ind.macd_slow)?;
        override_from_env("MACD_SIGNAL", &mut ind.macd_signal)?;
        override_from_env("MA_SHORT", &mut ind.ma_short)?;
        override_from_env("MA_LONG", &mut ind.ma_long)?;

        let pred = &mut config.predictor;
        override_from_env("PREDICTOR_WINDOW", &mut pred.window)?;
        override_from_env("PREDICTOR_HORIZON_SECS", &mut pred.horizon_secs)?;
        override_from_env("PREDICTOR_TIMEOUT_MS", &mut pred.timeout_ms)?;
        override_from_env("PREDICTOR_NORMALIZATION", &mut pred.normalization)?;
        if let Ok(path) = env::var("MODEL_PATH") {
            if !path.trim().is_empty() {
                pred.model_path = Some(PathBuf::from(path));
            }
        }

        let fusion = &mut config.fusion;
        override_from_env("FUSION_THRESHOLD", &mut fusion.threshold)?;
        override_from_env("WEIGHT_RSI", &mut fusion.weights.rsi)?;
        override_from_env("WEIGHT_MACD", &mut fusion.weights.macd)?;
        override_from_env("WEIGHT_MA_CROSS", &mut fusion.weights.ma_cross)?;
        override_from_env("WEIGHT_PREDICTOR", &mut fusion.weights.predictor)?;

        config.validate()?;
        Ok(config)
    }
}

fn override_from_env<T: FromStr>(key: &str, target: &mut T) -> Result<(), SignalError> {
    match env::var(key) {
        Ok(raw) => {
            *target = raw.trim().parse().map_err(|_| {
                SignalError::InvalidConfig(format!("{} has an invalid value: {:?}", key, raw))
            })?;
            Ok(())
        }
        Err(_) => Ok(()),
    }
}
