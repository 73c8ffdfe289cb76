//! Price history input types.

use crate::error::SignalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl PriceBar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar whose open, high and low all equal the close.
    pub fn from_close(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self::new(timestamp, close, close, close, close, 0.0)
    }
}

/// Validated, chronologically ordered price history.
///
/// Only constructible through [`PriceSeries::new`] (deserialization goes
/// through the same checks), so holding one means the bars are non-empty,
/// strictly increasing in time and carry positive finite prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SignalError> {
        if bars.is_empty() {
            return Err(SignalError::invalid_series("series is empty"));
        }

        for (i, bar) in bars.iter().enumerate() {
            let prices = [
                ("open", bar.open),
                ("high", bar.high),
                ("low", bar.low),
                ("close", bar.close),
            ];
            for (field, value) in prices {
                if !value.is_finite() || value <= 0.0 {
                    return Err(SignalError::invalid_series(format!(
                        "bar {} at {}: {} must be positive and finite, got {}",
                        i, bar.timestamp, field, value
                    )));
                }
            }
            if !bar.volume.is_finite() || bar.volume < 0.0 {
                return Err(SignalError::invalid_series(format!(
                    "bar {} at {}: volume must be non-negative and finite, got {}",
                    i, bar.timestamp, bar.volume
                )));
            }
        }

        for (i, pair) in bars.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.timestamp == prev.timestamp {
                return Err(SignalError::invalid_series(format!(
                    "bar {}: duplicate timestamp {}",
                    i + 1,
                    next.timestamp
                )));
            }
            if next.timestamp < prev.timestamp {
                return Err(SignalError::invalid_series(format!(
                    "bar {}: timestamp {} precedes {}",
                    i + 1,
                    next.timestamp,
                    prev.timestamp
                )));
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; an empty series cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Most recent bar.
    pub fn latest(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = SignalError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<PriceBar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}
