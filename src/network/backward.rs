use crate::activation::sigmoid::activation_slope;
use crate::math::matrix::Matrix;
use crate::network::forward::Activations;
use crate::network::params::NetworkParams;

/// Per-layer error signals, each shaped like the activation it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Deltas {
    /// N×H1
    pub hidden1: Matrix,
    /// N×H2
    pub hidden2: Matrix,
    /// N×O
    pub output: Matrix,
}

/// Propagates the output error `E` back through the network.
///
/// Each layer's delta is the next layer's delta pushed back through that
/// layer's transposed weights, then scaled by this layer's sigmoid slope:
///
/// ```text
/// δO  = E            ⊙ σ'(O)
/// δH2 = (δO  · W3ᵗ)  ⊙ σ'(H2)
/// δH1 = (δH2 · W2ᵗ)  ⊙ σ'(H1)
/// ```
pub fn backward(error: &Matrix, acts: &Activations, params: &NetworkParams) -> Deltas {
    let output = error.hadamard(&activation_slope(&acts.output));

    let hidden2_error = output.dot(&params.w3().transpose());
    let hidden2 = hidden2_error.hadamard(&activation_slope(&acts.hidden2));

    let hidden1_error = hidden2.dot(&params.w2().transpose());
    let hidden1 = hidden1_error.hadamard(&activation_slope(&acts.hidden1));

    Deltas { hidden1, hidden2, output }
}
