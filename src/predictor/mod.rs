//! Short-horizon directional forecasts from a pre-trained sequence model.

pub mod lstm;
pub mod model;
pub mod normalization;
pub mod sequence;

pub use lstm::{LstmModel, LstmWeights};
pub use model::{ModelHandle, SequenceModel};
pub use normalization::{NormalizationMethod, Normalizer};
pub use sequence::{DirectionalPredictor, SequencePredictor};
