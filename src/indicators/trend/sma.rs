//! SMA (Simple Moving Average) indicator

use crate::common::math;

/// Latest SMA over `period` closes.
pub fn calculate_sma(closes: &[f64], period: usize) -> Option<f64> {
    math::sma(closes, period)
}

/// Rolling SMA, one value per bar from bar `period - 1` onward.
pub fn sma_series(closes: &[f64], period: usize) -> Vec<f64> {
    math::sma_series(closes, period)
}
