//! Record of how a decision was reached.

use crate::models::prediction::DegradationReason;
use crate::signals::votes::{RationaleKey, Vote, VoteSource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub vote: Vote,
    pub weight: f64,
    /// `vote.value() * weight`
    pub contribution: f64,
    pub rationale: RationaleKey,
}

impl TraceEntry {
    pub fn new(vote: Vote, weight: f64) -> Self {
        let contribution = vote.value() * weight;
        let rationale = vote.rationale();
        Self {
            vote,
            weight,
            contribution,
            rationale,
        }
    }

    pub fn source(&self) -> VoteSource {
        self.vote.source()
    }

    /// Whether the source cast a non-zero vote.
    pub fn voted(&self) -> bool {
        self.vote.value() != 0.0
    }
}

/// Which branch of the decision rule produced the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    BuyThresholdExceeded,
    SellThresholdExceeded,
    WithinNeutralBand,
    /// Score exactly at plus or minus the threshold.
    AtThreshold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    /// One entry per participating source, in fixed source order.
    pub entries: Vec<TraceEntry>,
    pub weighted_sum: f64,
    /// Sum of weights of participating sources.
    pub denominator: f64,
    /// `weighted_sum / denominator`
    pub score: f64,
    pub threshold: f64,
    pub rule: DecisionRule,
    /// Set when the predictor sat out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<DegradationReason>,
}

impl DecisionTrace {
    pub fn entry(&self, source: VoteSource) -> Option<&TraceEntry> {
        self.entries.iter().find(|e| e.source() == source)
    }

    pub fn confidence(&self) -> f64 {
        self.score.abs().clamp(0.0, 1.0)
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}
