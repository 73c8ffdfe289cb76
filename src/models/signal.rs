use crate::models::indicators::IndicatorSnapshot;
use crate::models::prediction::Prediction;
use crate::signals::trace::DecisionTrace;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine output for one coin at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub coin: String,
    /// Timestamp of the latest bar in the evaluated series.
    pub evaluated_at: DateTime<Utc>,
    pub price: f64,
    pub action: Action,
    /// In [0, 1].
    pub confidence: f64,
    pub indicators: IndicatorSnapshot,
    pub prediction: Prediction,
    pub trace: DecisionTrace,
    /// Three to five bullets, most influential first.
    pub explanation: Vec<String>,
}
