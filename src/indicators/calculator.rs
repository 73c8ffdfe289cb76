//! Builds an [`IndicatorSnapshot`] from a price series.

use crate::config::IndicatorConfig;
use crate::error::SignalError;
use crate::indicators::momentum::{calculate_macd, calculate_rsi};
use crate::indicators::trend::calculate_ma_cross;
use crate::models::indicators::IndicatorSnapshot;
use crate::models::price::PriceSeries;
use tracing::debug;

/// Computes RSI, MACD and the moving-average crossover in one pass over the
/// closes. Pure: the same series and configuration always give the same
/// snapshot.
#[derive(Debug, Clone)]
pub struct IndicatorCalculator {
    config: IndicatorConfig,
}

impl IndicatorCalculator {
    pub fn new(config: IndicatorConfig) -> Result<Self, SignalError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Bars the series must contain before any indicator is computed.
    pub fn required_history(&self) -> usize {
        self.config.required_history()
    }

    pub fn compute(&self, series: &PriceSeries) -> Result<IndicatorSnapshot, SignalError> {
        let required = self.required_history();
        if series.len() < required {
            return Err(SignalError::InsufficientHistory {
                required,
                got: series.len(),
            });
        }

        let closes = series.closes();
        let cfg = &self.config;

        let rsi = calculate_rsi(&closes, cfg.rsi_period)?;
        let macd = calculate_macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal)?;
        let ma_cross = calculate_ma_cross(&closes, cfg.ma_short, cfg.ma_long)?;

        debug!(
            bars = closes.len(),
            rsi = rsi.value,
            macd_histogram = macd.histogram,
            short_ma = ma_cross.short_ma,
            long_ma = ma_cross.long_ma,
            just_crossed = ma_cross.just_crossed,
            "indicator snapshot computed"
        );

        Ok(IndicatorSnapshot {
            price: series.latest().close,
            rsi,
            macd,
            ma_cross,
        })
    }
}
