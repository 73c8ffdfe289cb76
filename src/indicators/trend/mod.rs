//! Trend indicators: SMA, moving-average crossover

pub mod ma_cross;
pub mod sma;

pub use ma_cross::*;
pub use sma::*;
