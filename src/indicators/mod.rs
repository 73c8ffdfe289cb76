//! Technical indicators computed from close prices.

pub mod calculator;
pub mod momentum;
pub mod trend;

pub use calculator::IndicatorCalculator;
pub use momentum::*;
pub use trend::*;
