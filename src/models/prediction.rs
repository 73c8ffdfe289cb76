//! Sequence-model forecast types.

use crate::predictor::normalization::Normalizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    /// Map an up-probability to a direction with a dead zone between the
    /// two thresholds.
    pub fn from_probability(probability: f64, up_threshold: f64, down_threshold: f64) -> Self {
        if probability > up_threshold {
            Direction::Up
        } else if probability < down_threshold {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    pub fn sign(&self) -> i8 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Flat => 0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Flat => "FLAT",
        };
        f.write_str(s)
    }
}

/// Why the predictor did not produce a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradationReason {
    NoModel,
    InsufficientWindow { required: usize, got: usize },
    ModelFailure { message: String },
    Timeout { after_ms: u64 },
    InvalidOutput { value: f64 },
}

impl DegradationReason {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            DegradationReason::NoModel => "no_model",
            DegradationReason::InsufficientWindow { .. } => "insufficient_window",
            DegradationReason::ModelFailure { .. } => "model_failure",
            DegradationReason::Timeout { .. } => "timeout",
            DegradationReason::InvalidOutput { .. } => "invalid_output",
        }
    }
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradationReason::NoModel => write!(f, "no model loaded"),
            DegradationReason::InsufficientWindow { required, got } => {
                write!(f, "window needs {} closes, got {}", required, got)
            }
            DegradationReason::ModelFailure { message } => write!(f, "model failed: {}", message),
            DegradationReason::Timeout { after_ms } => {
                write!(f, "inference timed out after {} ms", after_ms)
            }
            DegradationReason::InvalidOutput { value } => {
                write!(f, "model returned invalid probability {}", value)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub direction: Direction,
    /// Probability of an upward move over `horizon`, in [0, 1].
    pub probability: f64,
    pub horizon: Duration,
    pub model: String,
    pub model_version: String,
    /// Scaling fitted on the input window, for mapping model-space values
    /// back to prices.
    pub scaling: Normalizer,
}

/// Predictor output. An unavailable prediction carries only the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Prediction {
    Available(Forecast),
    Unavailable { reason: DegradationReason },
}

impl Prediction {
    pub fn unavailable(reason: DegradationReason) -> Self {
        Prediction::Unavailable { reason }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Prediction::Available(_))
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        match self {
            Prediction::Available(forecast) => Some(forecast),
            Prediction::Unavailable { .. } => None,
        }
    }

    pub fn degradation(&self) -> Option<&DegradationReason> {
        match self {
            Prediction::Available(_) => None,
            Prediction::Unavailable { reason } => Some(reason),
        }
    }
}
