use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::matrix::Matrix;
use crate::network::backward::Deltas;
use crate::network::forward::Activations;
use crate::network::params::NetworkParams;

/// How the full-batch weight gradient is scaled before the learning rate.
///
/// - `Sum`  — raw `Aᵗ · δ` summed over all N examples.
/// - `Mean` — the same product divided by N.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GradientScale {
    #[default]
    Sum,
    Mean,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    learning_rate: f64,
    scale: GradientScale,
}

impl Sgd {
    pub fn new(learning_rate: f64, scale: GradientScale) -> Result<Sgd, ConfigError> {
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(ConfigError::InvalidLearningRate(learning_rate));
        }
        Ok(Sgd { learning_rate, scale })
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn scale(&self) -> GradientScale {
        self.scale
    }

    /// Computes the next weight triple from one epoch's snapshot.
    ///
    /// ```text
    /// W3' = W3 - η·(H2ᵗ · δO)
    /// W2' = W2 - η·(H1ᵗ · δH2)
    /// W1' = W1 - η·(Xᵗ  · δH1)
    /// ```
    ///
    /// All three gradients are taken against `params` as passed in; nothing is
    /// installed until all three replacements exist.
    pub fn step(
        &self,
        params: &NetworkParams,
        inputs: &Matrix,
        acts: &Activations,
        deltas: &Deltas,
    ) -> NetworkParams {
        let factor = match self.scale {
            GradientScale::Sum => self.learning_rate,
            GradientScale::Mean => self.learning_rate / inputs.rows as f64,
        };

        let w3 = descend(params.w3(), &acts.hidden2, &deltas.output, factor);
        let w2 = descend(params.w2(), &acts.hidden1, &deltas.hidden2, factor);
        let w1 = descend(params.w1(), inputs, &deltas.hidden1, factor);

        params.replaced(w1, w2, w3)
    }
}

/// `weights - factor · (layer_inputᵗ · delta)`
fn descend(weights: &Matrix, layer_input: &Matrix, delta: &Matrix, factor: f64) -> Matrix {
    let gradient = layer_input.transpose().dot(delta);
    weights - &gradient.scale(factor)
}
