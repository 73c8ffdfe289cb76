//! Interface for pre-trained sequence models.

use crate::error::ModelError;
use std::sync::Arc;

/// A loaded, read-only model that scores a normalized price window.
///
/// Implementations must keep all recurrent state local to each call so one
/// instance can serve concurrent evaluations without locking.
pub trait SequenceModel: Send + Sync {
    /// Probability in [0, 1] that price rises over the model's horizon.
    fn predict_up_probability(&self, window: &[f64]) -> Result<f64, ModelError>;

    fn name(&self) -> &str;

    fn version(&self) -> &str;
}

/// Shared handle to a model loaded once at startup.
pub type ModelHandle = Arc<dyn SequenceModel>;
