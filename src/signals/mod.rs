//! Signal fusion, explanation and the evaluation engine.

pub mod engine;
pub mod explanation;
pub mod fusion;
pub mod trace;
pub mod votes;

pub use engine::SignalEngine;
pub use explanation::ExplanationGenerator;
pub use fusion::{FusionEngine, FusionOutcome};
pub use trace::{DecisionRule, DecisionTrace, TraceEntry};
pub use votes::{RationaleKey, Vote, VoteSource};
