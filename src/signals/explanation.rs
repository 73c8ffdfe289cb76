//! Renders a decision trace as a short list of bullet statements.

use crate::common::math::{self, RELATIVE_TOLERANCE};
use crate::models::signal::Action;
use crate::signals::trace::{DecisionRule, DecisionTrace, TraceEntry};
use crate::signals::votes::{MaCrossVote, MacdVote, PredictorVote, RsiVote, Vote, VoteSource};
use std::time::Duration;

pub const MIN_BULLETS: usize = 3;
pub const MAX_BULLETS: usize = 5;

/// Explanation builder.
///
/// Layout: one bullet per source that cast a non-zero vote (largest absolute
/// contribution first, ties in source order), then the decision itself,
/// then neutral context bullets until there are at least three. Every
/// bullet quotes the numbers it is based on.
pub struct ExplanationGenerator;

impl ExplanationGenerator {
    pub fn generate(trace: &DecisionTrace, action: Action) -> Vec<String> {
        let mut voters: Vec<&TraceEntry> = trace.entries.iter().filter(|e| e.voted()).collect();
        voters.sort_by(|a, b| {
            b.contribution
                .abs()
                .total_cmp(&a.contribution.abs())
                .then_with(|| a.source().cmp(&b.source()))
        });

        let mut bullets: Vec<String> = voters.iter().map(|entry| source_bullet(entry)).collect();
        bullets.push(decision_bullet(trace, action));

        for context in context_bullets(trace) {
            if bullets.len() >= MIN_BULLETS {
                break;
            }
            bullets.push(context);
        }

        bullets.truncate(MAX_BULLETS);
        bullets
    }
}

fn source_bullet(entry: &TraceEntry) -> String {
    let influence = format!("contribution {:+.2}", entry.contribution);
    match &entry.vote {
        Vote::Rsi(v) => rsi_bullet(v, &influence),
        Vote::Macd(v) => macd_bullet(v, &influence),
        Vote::MaCross(v) => ma_cross_bullet(v, &influence),
        Vote::Predictor(v) => predictor_bullet(v, &influence),
    }
}

fn rsi_bullet(v: &RsiVote, influence: &str) -> String {
    if v.sign > 0 {
        format!(
            "RSI({}) at {:.1} is below the {:.0} oversold line: bullish reversal pressure ({}).",
            v.period, v.value, v.oversold, influence
        )
    } else {
        format!(
            "RSI({}) at {:.1} is above the {:.0} overbought line: bearish exhaustion risk ({}).",
            v.period, v.value, v.overbought, influence
        )
    }
}

fn macd_bullet(v: &MacdVote, influence: &str) -> String {
    let (turn, reading) = if v.sign > 0 {
        ("turned positive", "bullish momentum cross")
    } else {
        ("turned negative", "bearish momentum cross")
    };
    format!(
        "MACD histogram {} from {:+.4} to {:+.4} (MACD {:.4} vs signal {:.4}): {} ({}).",
        turn, v.previous_histogram, v.histogram, v.macd, v.signal, reading, influence
    )
}

fn ma_cross_bullet(v: &MaCrossVote, influence: &str) -> String {
    let (side, reading) = if v.sign > 0 {
        ("above", "bullish trend change")
    } else {
        ("below", "bearish trend change")
    };
    format!(
        "MA{} ({:.2}) just crossed {} MA{} ({:.2}): {} ({}).",
        v.short_period, v.short_ma, side, v.long_period, v.long_ma, reading, influence
    )
}

fn predictor_bullet(v: &PredictorVote, influence: &str) -> String {
    format!(
        "Sequence model '{}' puts the odds of a rise over the next {} at {:.1}%, pointing {} ({}).",
        v.model,
        format_horizon(Duration::from_secs(v.horizon_secs)),
        v.probability * 100.0,
        v.direction,
        influence
    )
}

fn decision_bullet(trace: &DecisionTrace, action: Action) -> String {
    let basis = match trace.rule {
        DecisionRule::BuyThresholdExceeded => "clears the buy threshold",
        DecisionRule::SellThresholdExceeded => "clears the sell threshold",
        DecisionRule::WithinNeutralBand => "stays inside the neutral band",
        DecisionRule::AtThreshold => "lands exactly on the threshold, which resolves to HOLD",
    };
    let excluded = match &trace.degraded {
        Some(reason) => format!("; sequence model excluded ({})", reason),
        None => String::new(),
    };
    format!(
        "Decision {} at {:.0}% confidence: weighted score {:+.2} over {} sources {} (±{:.2}){}.",
        action,
        trace.confidence() * 100.0,
        trace.score,
        trace.entries.len(),
        basis,
        trace.threshold,
        excluded
    )
}

/// Neutral statements about sources that did not vote, in priority order.
fn context_bullets(trace: &DecisionTrace) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(Vote::MaCross(v)) = silent_vote(trace, VoteSource::MaCross) {
        out.push(trend_context(v));
    }

    match (trace.entry(VoteSource::Predictor), &trace.degraded) {
        (None, Some(reason)) => out.push(format!(
            "Sequence model unavailable ({}); the call rests on indicators alone.",
            reason
        )),
        (Some(entry), _) if !entry.voted() => {
            if let Vote::Predictor(v) = &entry.vote {
                out.push(format!(
                    "Sequence model '{}' is undecided at {:.1}% odds of a rise over the next {}: no directional vote.",
                    v.model,
                    v.probability * 100.0,
                    format_horizon(Duration::from_secs(v.horizon_secs))
                ));
            }
        }
        _ => {}
    }

    if let Some(Vote::Rsi(v)) = silent_vote(trace, VoteSource::Rsi) {
        out.push(format!(
            "RSI({}) at {:.1} sits inside the {:.0}-{:.0} neutral band.",
            v.period, v.value, v.oversold, v.overbought
        ));
    }

    if let Some(Vote::Macd(v)) = silent_vote(trace, VoteSource::Macd) {
        out.push(format!(
            "MACD histogram at {:+.4} (previous {:+.4}) shows no zero-line cross; MACD {:.4} vs signal {:.4}.",
            v.histogram, v.previous_histogram, v.macd, v.signal
        ));
    }

    out
}

fn silent_vote(trace: &DecisionTrace, source: VoteSource) -> Option<&Vote> {
    trace
        .entry(source)
        .filter(|entry| !entry.voted())
        .map(|entry| &entry.vote)
}

fn trend_context(v: &MaCrossVote) -> String {
    let tolerance = v.long_ma.abs() * RELATIVE_TOLERANCE;
    match math::sign_with_tolerance(v.short_ma - v.long_ma, tolerance) {
        1 => format!(
            "No fresh crossover: MA{} at {:.2} sits above MA{} at {:.2}, so the broader trend leans up.",
            v.short_period, v.short_ma, v.long_period, v.long_ma
        ),
        -1 => format!(
            "No fresh crossover: MA{} at {:.2} sits below MA{} at {:.2}, so the broader trend leans down.",
            v.short_period, v.short_ma, v.long_period, v.long_ma
        ),
        _ => format!(
            "MA{} at {:.2} and MA{} at {:.2} are level, showing no trend bias.",
            v.short_period, v.short_ma, v.long_period, v.long_ma
        ),
    }
}

/// `86400s` -> `1d`, `14400s` -> `4h`, `900s` -> `15m`.
pub fn format_horizon(horizon: Duration) -> String {
    let secs = horizon.as_secs();
    if secs > 0 && secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs > 0 && secs % 3_600 == 0 {
        format!("{}h", secs / 3_600)
    } else if secs > 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
