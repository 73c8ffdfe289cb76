//! RSI (Relative Strength Index) indicator

use crate::error::SignalError;
use crate::models::indicators::RsiIndicator;

/// RSI series using Wilder's smoothing.
///
/// The first average gain/loss is the simple mean of the first `period`
/// changes; every later bar updates it as `(avg * (period - 1) + x) / period`.
/// Index `i` of the result corresponds to `closes[i + period]`, so the first
/// `period` bars are warm-up and produce no value.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    let n = period as f64;
    let mut out = Vec::with_capacity(closes.len() - period);
    out.push(rsi_from_averages(avg_gain, avg_loss));

    for i in (period + 1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        out.push(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

/// RSI = 100 - 100 / (1 + avg_gain / avg_loss)
///
/// No movement at all reads as 50; no losses reads as 100.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// Latest RSI value.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Result<RsiIndicator, SignalError> {
    let required = period + 1;
    let value = rsi_series(closes, period)
        .last()
        .copied()
        .ok_or(SignalError::InsufficientHistory {
            required,
            got: closes.len(),
        })?;

    Ok(RsiIndicator { value, period })
}
