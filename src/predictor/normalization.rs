//! Window-local scaling of close prices.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMethod {
    MinMax,
    ZScore,
}

impl FromStr for NormalizationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minmax" | "min_max" | "min-max" => Ok(NormalizationMethod::MinMax),
            "zscore" | "z_score" | "z-score" => Ok(NormalizationMethod::ZScore),
            other => Err(format!("unknown normalization method: {}", other)),
        }
    }
}

/// Scaling fitted on one window. Statistics never leave the window they
/// were fitted on, and every transform can be inverted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Normalizer {
    MinMax { min: f64, max: f64 },
    ZScore { mean: f64, std_dev: f64 },
}

impl Normalizer {
    pub fn fit(method: NormalizationMethod, window: &[f64]) -> Self {
        match method {
            NormalizationMethod::MinMax => {
                let min = window.iter().copied().fold(f64::INFINITY, f64::min);
                let max = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if window.is_empty() {
                    Normalizer::MinMax { min: 0.0, max: 0.0 }
                } else {
                    Normalizer::MinMax { min, max }
                }
            }
            NormalizationMethod::ZScore => {
                if window.is_empty() {
                    return Normalizer::ZScore {
                        mean: 0.0,
                        std_dev: 0.0,
                    };
                }
                let n = window.len() as f64;
                let mean = window.iter().sum::<f64>() / n;
                let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                Normalizer::ZScore {
                    mean,
                    std_dev: variance.sqrt(),
                }
            }
        }
    }

    /// A window with no spread maps every value to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        match *self {
            Normalizer::MinMax { min, max } => {
                let range = max - min;
                if range > 0.0 {
                    (value - min) / range
                } else {
                    0.0
                }
            }
            Normalizer::ZScore { mean, std_dev } => {
                if std_dev > 0.0 {
                    (value - mean) / std_dev
                } else {
                    0.0
                }
            }
        }
    }

    /// Map a model-space value back to the price scale of the fitted window.
    pub fn denormalize(&self, value: f64) -> f64 {
        match *self {
            Normalizer::MinMax { min, max } => min + value * (max - min),
            Normalizer::ZScore { mean, std_dev } => mean + value * std_dev,
        }
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.normalize(v)).collect()
    }
}
