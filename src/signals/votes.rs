//! The closed set of vote sources and how each one casts its vote.

use crate::common::math::{self, RELATIVE_TOLERANCE};
use crate::models::indicators::{MacdIndicator, MovingAverageCross, RsiIndicator};
use crate::models::prediction::{Direction, Forecast};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vote sources in their fixed evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteSource {
    Rsi,
    Macd,
    MaCross,
    Predictor,
}

impl VoteSource {
    pub const ORDER: [VoteSource; 4] = [
        VoteSource::Rsi,
        VoteSource::Macd,
        VoteSource::MaCross,
        VoteSource::Predictor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VoteSource::Rsi => "RSI",
            VoteSource::Macd => "MACD",
            VoteSource::MaCross => "MA cross",
            VoteSource::Predictor => "Sequence model",
        }
    }
}

impl fmt::Display for VoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What made a source vote the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RationaleKey {
    RsiOversold,
    RsiOverbought,
    RsiNeutral,
    MacdBullishCross,
    MacdBearishCross,
    MacdNoCross,
    MaBullishCross,
    MaBearishCross,
    MaNoCross,
    PredictorUp,
    PredictorDown,
    PredictorFlat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiVote {
    pub value: f64,
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
    pub sign: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdVote {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub previous_histogram: f64,
    pub sign: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaCrossVote {
    pub short_ma: f64,
    pub long_ma: f64,
    pub short_period: usize,
    pub long_period: usize,
    pub just_crossed: bool,
    pub sign: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorVote {
    pub direction: Direction,
    pub probability: f64,
    /// `min(1, |p - 0.5| * 2)`; zero for a flat forecast.
    pub magnitude: f64,
    pub model: String,
    pub horizon_secs: u64,
}

/// One source's vote together with the values behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Vote {
    Rsi(RsiVote),
    Macd(MacdVote),
    MaCross(MaCrossVote),
    Predictor(PredictorVote),
}

impl Vote {
    /// +1 below the oversold line, -1 above the overbought line.
    pub fn rsi(rsi: &RsiIndicator, oversold: f64, overbought: f64) -> Self {
        let sign = if rsi.value < oversold {
            1
        } else if rsi.value > overbought {
            -1
        } else {
            0
        };
        Vote::Rsi(RsiVote {
            value: rsi.value,
            period: rsi.period,
            oversold,
            overbought,
            sign,
        })
    }

    /// +1 when the histogram turns positive on the latest bar, -1 when it
    /// turns negative. Values within a tolerance of `price` count as zero.
    pub fn macd(macd: &MacdIndicator, price: f64) -> Self {
        let tolerance = price.abs() * RELATIVE_TOLERANCE;
        let now = math::sign_with_tolerance(macd.histogram, tolerance);
        let before = math::sign_with_tolerance(macd.previous_histogram, tolerance);
        let sign = if now > 0 && before <= 0 {
            1
        } else if now < 0 && before >= 0 {
            -1
        } else {
            0
        };
        Vote::Macd(MacdVote {
            macd: macd.macd,
            signal: macd.signal,
            histogram: macd.histogram,
            previous_histogram: macd.previous_histogram,
            sign,
        })
    }

    /// Votes only on the bar where the short average crosses the long one.
    pub fn ma_cross(cross: &MovingAverageCross) -> Self {
        let sign = match (cross.just_crossed, cross.short_above_long, cross.short_below_long) {
            (true, true, _) => 1,
            (true, _, true) => -1,
            _ => 0,
        };
        Vote::MaCross(MaCrossVote {
            short_ma: cross.short_ma,
            long_ma: cross.long_ma,
            short_period: cross.short_period,
            long_period: cross.long_period,
            just_crossed: cross.just_crossed,
            sign,
        })
    }

    /// Direction scaled by conviction: the further from 0.5, the stronger.
    pub fn predictor(forecast: &Forecast) -> Self {
        let magnitude = match forecast.direction {
            Direction::Flat => 0.0,
            _ => ((forecast.probability - 0.5).abs() * 2.0).min(1.0),
        };
        Vote::Predictor(PredictorVote {
            direction: forecast.direction,
            probability: forecast.probability,
            magnitude,
            model: forecast.model.clone(),
            horizon_secs: forecast.horizon.as_secs(),
        })
    }

    pub fn source(&self) -> VoteSource {
        match self {
            Vote::Rsi(_) => VoteSource::Rsi,
            Vote::Macd(_) => VoteSource::Macd,
            Vote::MaCross(_) => VoteSource::MaCross,
            Vote::Predictor(_) => VoteSource::Predictor,
        }
    }

    pub fn sign(&self) -> i8 {
        match self {
            Vote::Rsi(v) => v.sign,
            Vote::Macd(v) => v.sign,
            Vote::MaCross(v) => v.sign,
            Vote::Predictor(v) => {
                if v.magnitude > 0.0 {
                    v.direction.sign()
                } else {
                    0
                }
            }
        }
    }

    pub fn magnitude(&self) -> f64 {
        match self {
            Vote::Predictor(v) => v.magnitude,
            _ => f64::from(self.sign().abs()),
        }
    }

    /// Signed vote in [-1, 1].
    pub fn value(&self) -> f64 {
        f64::from(self.sign()) * self.magnitude()
    }

    pub fn rationale(&self) -> RationaleKey {
        match (self.source(), self.sign()) {
            (VoteSource::Rsi, 1) => RationaleKey::RsiOversold,
            (VoteSource::Rsi, -1) => RationaleKey::RsiOverbought,
            (VoteSource::Rsi, _) => RationaleKey::RsiNeutral,
            (VoteSource::Macd, 1) => RationaleKey::MacdBullishCross,
            (VoteSource::Macd, -1) => RationaleKey::MacdBearishCross,
            (VoteSource::Macd, _) => RationaleKey::MacdNoCross,
            (VoteSource::MaCross, 1) => RationaleKey::MaBullishCross,
            (VoteSource::MaCross, -1) => RationaleKey::MaBearishCross,
            (VoteSource::MaCross, _) => RationaleKey::MaNoCross,
            (VoteSource::Predictor, 1) => RationaleKey::PredictorUp,
            (VoteSource::Predictor, -1) => RationaleKey::PredictorDown,
            (VoteSource::Predictor, _) => RationaleKey::PredictorFlat,
        }
    }
}
