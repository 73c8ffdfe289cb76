//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::error::SignalError;
use crate::models::indicators::MacdIndicator;

/// MACD line, signal line and histogram aligned to the same bars.
///
/// All three vectors share one length; their last element is the latest bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
///
/// Every EMA is seeded with the simple average of its first window, so the
/// first histogram value lands on bar `slow + signal - 2`.
pub fn macd_series(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    if fast == 0 || signal == 0 || fast >= slow || closes.len() < slow + signal - 1 {
        return MacdSeries::default();
    }

    let fast_ema = math::ema_series(closes, fast);
    let slow_ema = math::ema_series(closes, slow);

    // slow_ema[j] is bar j + slow - 1; the same bar in fast_ema is offset by slow - fast.
    let offset = slow - fast;
    let macd_line: Vec<f64> = slow_ema
        .iter()
        .enumerate()
        .map(|(j, slow_value)| fast_ema[j + offset] - slow_value)
        .collect();

    let signal_line = math::ema_series(&macd_line, signal);
    let macd_aligned = macd_line[signal - 1..].to_vec();
    let histogram = macd_aligned
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| m - s)
        .collect();

    MacdSeries {
        macd: macd_aligned,
        signal: signal_line,
        histogram,
    }
}

/// Latest MACD values plus the previous histogram for cross detection.
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Result<MacdIndicator, SignalError> {
    let required = slow + signal;
    if closes.len() < required {
        return Err(SignalError::InsufficientHistory {
            required,
            got: closes.len(),
        });
    }

    let series = macd_series(closes, fast, slow, signal);
    let n = series.histogram.len();
    if n < 2 {
        return Err(SignalError::InsufficientHistory {
            required,
            got: closes.len(),
        });
    }

    Ok(MacdIndicator {
        macd: series.macd[n - 1],
        signal: series.signal[n - 1],
        histogram: series.histogram[n - 1],
        previous_histogram: series.histogram[n - 2],
        period: (fast, slow, signal),
    })
}
