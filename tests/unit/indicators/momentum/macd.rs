//! Unit tests for MACD indicator

use hybrid_signal::error::SignalError;
use hybrid_signal::indicators::momentum::{calculate_macd, macd_series};

fn wave(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 100.0 + 8.0 * ((i as f64) * 0.21).sin() + 0.05 * i as f64)
        .collect()
}

#[test]
fn test_histogram_is_exact_difference() {
    let series = macd_series(&wave(120), 12, 26, 9);
    assert!(!series.histogram.is_empty());
    assert_eq!(series.macd.len(), series.signal.len());
    assert_eq!(series.macd.len(), series.histogram.len());
    for i in 0..series.histogram.len() {
        assert_eq!(series.histogram[i], series.macd[i] - series.signal[i]);
    }

    let latest = calculate_macd(&wave(120), 12, 26, 9).unwrap();
    assert_eq!(latest.histogram, latest.macd - latest.signal);
    assert_eq!(latest.period, (12, 26, 9));
}

#[test]
fn test_series_alignment() {
    // first histogram value lands on bar slow + signal - 2
    let closes = wave(60);
    let series = macd_series(&closes, 12, 26, 9);
    assert_eq!(series.histogram.len(), 60 - 26 - 9 + 2);
}

#[test]
fn test_previous_histogram_is_second_to_last() {
    let closes = wave(80);
    let series = macd_series(&closes, 12, 26, 9);
    let latest = calculate_macd(&closes, 12, 26, 9).unwrap();
    let n = series.histogram.len();
    assert_eq!(latest.histogram, series.histogram[n - 1]);
    assert_eq!(latest.previous_histogram, series.histogram[n - 2]);
}

#[test]
fn test_macd_insufficient_data() {
    assert_eq!(
        calculate_macd(&wave(34), 12, 26, 9),
        Err(SignalError::InsufficientHistory {
            required: 35,
            got: 34
        })
    );
    assert!(calculate_macd(&wave(35), 12, 26, 9).is_ok());
}

#[test]
fn test_flat_prices_have_zero_histogram() {
    let macd = calculate_macd(&[42.0; 60], 12, 26, 9).unwrap();
    assert!(macd.macd.abs() < 1e-9);
    assert!(macd.histogram.abs() < 1e-9);
    assert!(macd.previous_histogram.abs() < 1e-9);
}

#[test]
fn test_rising_prices_have_positive_macd_line() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
    let macd = calculate_macd(&closes, 12, 26, 9).unwrap();
    assert!(macd.macd > 0.0);
}
