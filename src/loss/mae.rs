use crate::math::matrix::Matrix;

pub struct MaeLoss;

impl MaeLoss {
    /// Output error `E = O - Y`, shape N×O. Backpropagation starts from this matrix.
    pub fn error(output: &Matrix, target: &Matrix) -> Matrix {
        output - target
    }

    /// Scalar MAE: `(1 / (N·O)) * Σ|E[i][j]|`.
    ///
    /// Diagnostic only. Non-finite entries propagate into the result.
    pub fn loss(error: &Matrix) -> f64 {
        error.mean_abs()
    }
}
