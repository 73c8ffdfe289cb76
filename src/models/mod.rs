//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod prediction;
pub mod price;
pub mod signal;

pub use indicators::{IndicatorSnapshot, MacdIndicator, MovingAverageCross, RsiIndicator};
pub use prediction::{DegradationReason, Direction, Forecast, Prediction};
pub use price::{PriceBar, PriceSeries};
pub use signal::{Action, Signal};
