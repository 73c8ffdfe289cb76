//! Short/long simple moving-average crossover

use crate::common::math::{self, RELATIVE_TOLERANCE};
use crate::error::SignalError;
use crate::models::indicators::MovingAverageCross;

/// Crossover state on the latest bar.
///
/// `just_crossed` is set only when the sign of `short - long` on the latest
/// bar differs from the sign on the bar before it. Spreads within a relative
/// tolerance of the long average count as equal.
pub fn calculate_ma_cross(
    closes: &[f64],
    short_period: usize,
    long_period: usize,
) -> Result<MovingAverageCross, SignalError> {
    let required = long_period + 1;
    let insufficient = || SignalError::InsufficientHistory {
        required,
        got: closes.len(),
    };
    if short_period == 0 || closes.len() < required {
        return Err(insufficient());
    }

    let previous = &closes[..closes.len() - 1];
    let short_ma = math::sma(closes, short_period).ok_or_else(insufficient)?;
    let long_ma = math::sma(closes, long_period).ok_or_else(insufficient)?;
    let previous_short_ma = math::sma(previous, short_period).ok_or_else(insufficient)?;
    let previous_long_ma = math::sma(previous, long_period).ok_or_else(insufficient)?;

    let relation = spread_sign(short_ma, long_ma);
    let previous_relation = spread_sign(previous_short_ma, previous_long_ma);

    Ok(MovingAverageCross {
        short_ma,
        long_ma,
        previous_short_ma,
        previous_long_ma,
        short_period,
        long_period,
        short_above_long: relation > 0,
        short_below_long: relation < 0,
        just_crossed: relation != previous_relation,
    })
}

fn spread_sign(short_ma: f64, long_ma: f64) -> i8 {
    math::sign_with_tolerance(short_ma - long_ma, long_ma.abs() * RELATIVE_TOLERANCE)
}
