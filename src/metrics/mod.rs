//! Prometheus metrics for signal evaluation.

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramTimer, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    /// Completed evaluations, labelled by action.
    pub signal_evaluations_total: IntCounterVec,
    /// Failed evaluations, labelled by error kind.
    pub signal_evaluation_errors_total: IntCounterVec,
    /// Predictions that fell back to indicator-only mode, labelled by reason.
    pub predictor_degraded_total: IntCounterVec,
    pub signal_evaluations_active: IntGauge,
    pub signal_evaluation_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let signal_evaluations_total = IntCounterVec::new(
            Opts::new("signal_evaluations_total", "Signals produced, by action"),
            &["action"],
        )?;
        let signal_evaluation_errors_total = IntCounterVec::new(
            Opts::new(
                "signal_evaluation_errors_total",
                "Evaluations rejected, by error kind",
            ),
            &["kind"],
        )?;
        let predictor_degraded_total = IntCounterVec::new(
            Opts::new(
                "predictor_degraded_total",
                "Evaluations where the sequence predictor was unavailable",
            ),
            &["reason"],
        )?;
        let signal_evaluations_active = IntGauge::new(
            "signal_evaluations_active",
            "Evaluations currently in progress",
        )?;
        let signal_evaluation_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "signal_evaluation_duration_seconds",
                "Wall time of a full signal evaluation",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0]),
        )?;

        registry.register(Box::new(signal_evaluations_total.clone()))?;
        registry.register(Box::new(signal_evaluation_errors_total.clone()))?;
        registry.register(Box::new(predictor_degraded_total.clone()))?;
        registry.register(Box::new(signal_evaluations_active.clone()))?;
        registry.register(Box::new(signal_evaluation_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            signal_evaluations_total,
            signal_evaluation_errors_total,
            predictor_degraded_total,
            signal_evaluations_active,
            signal_evaluation_duration_seconds,
        })
    }

    /// Mark an evaluation as in flight until the returned guard is dropped.
    /// The guard also records the evaluation duration on drop.
    pub fn track_evaluation(&self) -> EvaluationGuard<'_> {
        self.signal_evaluations_active.inc();
        EvaluationGuard {
            active: &self.signal_evaluations_active,
            _timer: self.signal_evaluation_duration_seconds.start_timer(),
        }
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Releases the in-flight gauge on every exit path, cancellation included.
pub struct EvaluationGuard<'a> {
    active: &'a IntGauge,
    _timer: HistogramTimer,
}

impl Drop for EvaluationGuard<'_> {
    fn drop(&mut self) {
        self.active.dec();
    }
}
