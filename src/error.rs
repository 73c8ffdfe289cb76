use thiserror::Error;

/// Errors surfaced to callers of the engine.
///
/// Predictor problems never appear here; they degrade the prediction to
/// unavailable instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    /// Malformed input. Retrying without fixing the series will fail again.
    #[error("Invalid price series: {reason}")]
    InvalidSeries { reason: String },

    /// Too few bars for the configured indicator windows. The caller may
    /// retry after fetching more history.
    #[error("Insufficient price history: {required} bars required, got {got}")]
    InsufficientHistory { required: usize, got: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SignalError {
    pub fn invalid_series(reason: impl Into<String>) -> Self {
        SignalError::InvalidSeries {
            reason: reason.into(),
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SignalError::InvalidSeries { .. } => "invalid_series",
            SignalError::InsufficientHistory { .. } => "insufficient_history",
            SignalError::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Failures while loading or running the sequence model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model artifact: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    #[error("Model artifact has invalid shape: {0}")]
    Shape(String),

    #[error("Model inference failed: {0}")]
    Inference(String),
}
