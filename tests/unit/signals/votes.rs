//! Unit tests for per-source votes

use hybrid_signal::models::{
    Direction, Forecast, MacdIndicator, MovingAverageCross, RsiIndicator,
};
use hybrid_signal::predictor::Normalizer;
use hybrid_signal::signals::{RationaleKey, TraceEntry, Vote, VoteSource};
use std::time::Duration;

fn rsi(value: f64) -> RsiIndicator {
    RsiIndicator { value, period: 14 }
}

fn macd(previous_histogram: f64, histogram: f64) -> MacdIndicator {
    MacdIndicator {
        macd: 1.0,
        signal: 1.0 - histogram,
        histogram,
        previous_histogram,
        period: (12, 26, 9),
    }
}

fn cross(short_ma: f64, long_ma: f64, just_crossed: bool) -> MovingAverageCross {
    MovingAverageCross {
        short_ma,
        long_ma,
        previous_short_ma: long_ma,
        previous_long_ma: short_ma,
        short_period: 20,
        long_period: 50,
        short_above_long: short_ma > long_ma,
        short_below_long: short_ma < long_ma,
        just_crossed,
    }
}

fn forecast(direction: Direction, probability: f64) -> Forecast {
    Forecast {
        direction,
        probability,
        horizon: Duration::from_secs(86_400),
        model: "lstm".to_string(),
        model_version: "1".to_string(),
        scaling: Normalizer::ZScore {
            mean: 100.0,
            std_dev: 2.0,
        },
    }
}

#[test]
fn test_rsi_vote_bands() {
    assert_eq!(Vote::rsi(&rsi(25.0), 30.0, 70.0).sign(), 1);
    assert_eq!(Vote::rsi(&rsi(75.0), 30.0, 70.0).sign(), -1);
    assert_eq!(Vote::rsi(&rsi(50.0), 30.0, 70.0).sign(), 0);
    // Boundaries are neutral.
    assert_eq!(Vote::rsi(&rsi(30.0), 30.0, 70.0).sign(), 0);
    assert_eq!(Vote::rsi(&rsi(70.0), 30.0, 70.0).sign(), 0);

    let vote = Vote::rsi(&rsi(25.0), 30.0, 70.0);
    assert_eq!(vote.rationale(), RationaleKey::RsiOversold);
    assert_eq!(vote.source(), VoteSource::Rsi);
    assert_eq!(vote.value(), 1.0);
}

#[test]
fn test_macd_vote_needs_a_zero_line_cross() {
    assert_eq!(Vote::macd(&macd(-0.2, 0.3), 100.0).sign(), 1);
    assert_eq!(Vote::macd(&macd(0.0, 0.3), 100.0).sign(), 1);
    assert_eq!(Vote::macd(&macd(0.2, -0.3), 100.0).sign(), -1);
    assert_eq!(Vote::macd(&macd(0.0, -0.3), 100.0).sign(), -1);
    assert_eq!(Vote::macd(&macd(0.1, 0.3), 100.0).sign(), 0);
    assert_eq!(Vote::macd(&macd(-0.1, -0.3), 100.0).sign(), 0);
}

#[test]
fn test_macd_noise_below_tolerance_is_zero() {
    // 1e-9 relative to a price of 100 is 1e-7.
    assert_eq!(Vote::macd(&macd(-0.2, 5e-8), 100.0).sign(), 0);
    assert_eq!(Vote::macd(&macd(-5e-8, 0.2), 100.0).sign(), 1);
    assert_eq!(
        Vote::macd(&macd(-0.2, 5e-8), 100.0).rationale(),
        RationaleKey::MacdNoCross
    );
}

#[test]
fn test_ma_vote_only_on_crossing_bar() {
    assert_eq!(Vote::ma_cross(&cross(101.0, 100.0, true)).sign(), 1);
    assert_eq!(Vote::ma_cross(&cross(99.0, 100.0, true)).sign(), -1);
    assert_eq!(Vote::ma_cross(&cross(101.0, 100.0, false)).sign(), 0);
    // Touching after being apart is a relation change but picks no side.
    assert_eq!(Vote::ma_cross(&cross(100.0, 100.0, true)).sign(), 0);
    assert_eq!(
        Vote::ma_cross(&cross(99.0, 100.0, true)).rationale(),
        RationaleKey::MaBearishCross
    );
}

#[test]
fn test_predictor_vote_scales_with_conviction() {
    let vote = Vote::predictor(&forecast(Direction::Up, 0.8));
    assert!((vote.magnitude() - 0.6).abs() < 1e-12);
    assert!((vote.value() - 0.6).abs() < 1e-12);
    assert_eq!(vote.rationale(), RationaleKey::PredictorUp);

    let vote = Vote::predictor(&forecast(Direction::Down, 0.1));
    assert!((vote.value() + 0.8).abs() < 1e-12);

    let vote = Vote::predictor(&forecast(Direction::Down, 0.0));
    assert_eq!(vote.value(), -1.0);

    let vote = Vote::predictor(&forecast(Direction::Flat, 0.52));
    assert_eq!(vote.value(), 0.0);
    assert_eq!(vote.rationale(), RationaleKey::PredictorFlat);
}

#[test]
fn test_trace_entry_contribution() {
    let entry = TraceEntry::new(Vote::predictor(&forecast(Direction::Up, 0.9)), 1.5);
    assert!((entry.contribution - 1.2).abs() < 1e-12);
    assert!(entry.voted());
    assert_eq!(entry.source(), VoteSource::Predictor);

    let entry = TraceEntry::new(Vote::rsi(&rsi(50.0), 30.0, 70.0), 1.0);
    assert_eq!(entry.contribution, 0.0);
    assert!(!entry.voted());
}

#[test]
fn test_source_order() {
    let mut sources = vec![
        VoteSource::Predictor,
        VoteSource::MaCross,
        VoteSource::Rsi,
        VoteSource::Macd,
    ];
    sources.sort();
    assert_eq!(sources, VoteSource::ORDER.to_vec());
}
