//! Single-layer LSTM inference over a univariate price window.
//!
//! Weights come from a JSON artifact exported after training:
//!
//! ```json
//! {
//!   "name": "price-lstm",
//!   "version": "1",
//!   "hidden_size": 2,
//!   "weight_ih": [..4H..],
//!   "weight_hh": [[..H..], ..4H rows..],
//!   "bias_ih": [..4H..],
//!   "bias_hh": [..4H..],
//!   "fc_weight": [..H..],
//!   "fc_bias": 0.0
//! }
//! ```
//!
//! Gate rows are stacked input, forget, cell, output. The final hidden state
//! goes through a linear head and a sigmoid to give the up-probability.

use crate::error::ModelError;
use crate::predictor::model::SequenceModel;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmWeights {
    pub name: String,
    pub version: String,
    pub hidden_size: usize,
    pub weight_ih: Vec<f64>,
    pub weight_hh: Vec<Vec<f64>>,
    pub bias_ih: Vec<f64>,
    pub bias_hh: Vec<f64>,
    pub fc_weight: Vec<f64>,
    pub fc_bias: f64,
}

impl LstmWeights {
    pub fn validate(&self) -> Result<(), ModelError> {
        let h = self.hidden_size;
        if h == 0 {
            return Err(ModelError::Shape("hidden_size must be positive".to_string()));
        }
        let gates = h
            .checked_mul(4)
            .ok_or_else(|| ModelError::Shape("hidden_size too large".to_string()))?;
        let check = |field: &str, len: usize, expected: usize| {
            if len == expected {
                Ok(())
            } else {
                Err(ModelError::Shape(format!(
                    "{} has length {}, expected {}",
                    field, len, expected
                )))
            }
        };
        check("weight_ih", self.weight_ih.len(), gates)?;
        check("weight_hh", self.weight_hh.len(), gates)?;
        for (i, row) in self.weight_hh.iter().enumerate() {
            check(&format!("weight_hh[{}]", i), row.len(), h)?;
        }
        check("bias_ih", self.bias_ih.len(), gates)?;
        check("bias_hh", self.bias_hh.len(), gates)?;
        check("fc_weight", self.fc_weight.len(), h)?;

        let all_finite = self
            .weight_ih
            .iter()
            .chain(self.weight_hh.iter().flatten())
            .chain(&self.bias_ih)
            .chain(&self.bias_hh)
            .chain(&self.fc_weight)
            .chain(std::iter::once(&self.fc_bias))
            .all(|w| w.is_finite());
        if !all_finite {
            return Err(ModelError::Shape("weights contain non-finite values".to_string()));
        }
        Ok(())
    }
}

/// Immutable LSTM classifier. Each call runs with fresh hidden and cell
/// state, so the model is safe to share across threads.
#[derive(Debug, Clone)]
pub struct LstmModel {
    weights: LstmWeights,
}

impl LstmModel {
    pub fn from_weights(weights: LstmWeights) -> Result<Self, ModelError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Load and validate a JSON weights artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let weights: LstmWeights = serde_json::from_str(&raw)?;
        Self::from_weights(weights)
    }

    pub fn hidden_size(&self) -> usize {
        self.weights.hidden_size
    }

    fn step(&self, x: f64, h: &[f64], c: &mut [f64]) -> Vec<f64> {
        let w = &self.weights;
        let hs = w.hidden_size;

        let gates: Vec<f64> = (0..4 * hs)
            .map(|row| {
                let recurrent: f64 = w.weight_hh[row].iter().zip(h).map(|(a, b)| a * b).sum();
                w.weight_ih[row] * x + w.bias_ih[row] + w.bias_hh[row] + recurrent
            })
            .collect();

        let mut next_h = vec![0.0; hs];
        for u in 0..hs {
            let input_gate = sigmoid(gates[u]);
            let forget_gate = sigmoid(gates[hs + u]);
            let cell_candidate = gates[2 * hs + u].tanh();
            let output_gate = sigmoid(gates[3 * hs + u]);

            c[u] = forget_gate * c[u] + input_gate * cell_candidate;
            next_h[u] = output_gate * c[u].tanh();
        }
        next_h
    }
}

impl SequenceModel for LstmModel {
    fn predict_up_probability(&self, window: &[f64]) -> Result<f64, ModelError> {
        if window.is_empty() {
            return Err(ModelError::Inference("empty input window".to_string()));
        }
        if window.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Inference(
                "input window contains non-finite values".to_string(),
            ));
        }

        let hs = self.weights.hidden_size;
        let mut h = vec![0.0; hs];
        let mut c = vec![0.0; hs];
        for &x in window {
            h = self.step(x, &h, &mut c);
        }

        let logit: f64 = self
            .weights
            .fc_weight
            .iter()
            .zip(&h)
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.weights.fc_bias;

        Ok(sigmoid(logit))
    }

    fn name(&self) -> &str {
        &self.weights.name
    }

    fn version(&self) -> &str {
        &self.weights.version
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
