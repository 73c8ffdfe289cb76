use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiIndicator {
    /// Always within [0, 100].
    pub value: f64,
    pub period: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    /// `macd - signal` on the latest bar.
    pub histogram: f64,
    /// Histogram on the bar before the latest one.
    pub previous_histogram: f64,
    /// (fast, slow, signal)
    pub period: (usize, usize, usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageCross {
    pub short_ma: f64,
    pub long_ma: f64,
    pub previous_short_ma: f64,
    pub previous_long_ma: f64,
    pub short_period: usize,
    pub long_period: usize,
    pub short_above_long: bool,
    pub short_below_long: bool,
    /// The short/long relation on the latest bar differs from the previous bar.
    pub just_crossed: bool,
}

/// Indicator values computed from one price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// Latest close the indicators were computed at.
    pub price: f64,
    pub rsi: RsiIndicator,
    pub macd: MacdIndicator,
    pub ma_cross: MovingAverageCross,
}
