//! Unit tests for the indicator snapshot

use crate::test_utils::{flat_closes, linear_closes, series_from_closes};
use hybrid_signal::config::IndicatorConfig;
use hybrid_signal::error::SignalError;
use hybrid_signal::indicators::IndicatorCalculator;

fn calculator() -> IndicatorCalculator {
    IndicatorCalculator::new(IndicatorConfig::default()).unwrap()
}

#[test]
fn test_rejects_invalid_config() {
    let config = IndicatorConfig {
        ma_short: 60,
        ..IndicatorConfig::default()
    };
    assert!(IndicatorCalculator::new(config).is_err());
}

#[test]
fn test_short_series_reports_longest_requirement() {
    let series = series_from_closes(&linear_closes(40, 100.0, 1.0));
    assert_eq!(
        calculator().compute(&series),
        Err(SignalError::InsufficientHistory {
            required: 51,
            got: 40
        })
    );
}

#[test]
fn test_flat_series_snapshot() {
    let snapshot = calculator()
        .compute(&series_from_closes(&flat_closes(60, 100.0)))
        .unwrap();
    assert_eq!(snapshot.price, 100.0);
    assert_eq!(snapshot.rsi.value, 50.0);
    assert!(snapshot.macd.histogram.abs() < 1e-9);
    assert!(!snapshot.ma_cross.just_crossed);
    assert_eq!(snapshot.ma_cross.short_ma, snapshot.ma_cross.long_ma);
}

#[test]
fn test_rising_series_is_overbought() {
    let snapshot = calculator()
        .compute(&series_from_closes(&linear_closes(80, 100.0, 0.75)))
        .unwrap();
    assert!(snapshot.rsi.value > 70.0);
    assert!(snapshot.ma_cross.short_above_long);
    assert!(snapshot.macd.macd > 0.0);
}

#[test]
fn test_custom_periods_change_requirement() {
    let config = IndicatorConfig {
        rsi_period: 5,
        macd_fast: 3,
        macd_slow: 6,
        macd_signal: 3,
        ma_short: 3,
        ma_long: 8,
    };
    let calc = IndicatorCalculator::new(config).unwrap();
    assert_eq!(calc.required_history(), 9);
    let snapshot = calc
        .compute(&series_from_closes(&linear_closes(9, 50.0, 1.0)))
        .unwrap();
    assert_eq!(snapshot.rsi.period, 5);
    assert_eq!(snapshot.ma_cross.long_period, 8);
}

#[test]
fn test_snapshot_is_deterministic() {
    let series = series_from_closes(&linear_closes(70, 20.0, 0.3));
    assert_eq!(
        calculator().compute(&series).unwrap(),
        calculator().compute(&series).unwrap()
    );
}
