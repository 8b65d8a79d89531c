use crate::activation::sigmoid::activate;
use crate::math::matrix::Matrix;
use crate::network::params::NetworkParams;

/// Activations produced by one forward pass, kept for that epoch's backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Activations {
    /// N×H1
    pub hidden1: Matrix,
    /// N×H2
    pub hidden2: Matrix,
    /// N×O
    pub output: Matrix,
}

/// Runs `inputs` (N×F) through all three sigmoid layers.
///
/// Pure: neither `inputs` nor `params` is modified.
///
/// # Panics
/// Panics if `inputs.cols` differs from the input width of `params`. The
/// trainer validates this before the first epoch.
pub fn forward(inputs: &Matrix, params: &NetworkParams) -> Activations {
    let hidden1 = activate(&inputs.dot(params.w1()));
    let hidden2 = activate(&hidden1.dot(params.w2()));
    let output = activate(&hidden2.dot(params.w3()));

    Activations { hidden1, hidden2, output }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::topology::Topology;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn output_shape_follows_topology() {
        let mut rng = StdRng::seed_from_u64(3);
        for (n, f) in [(1, 1), (4, 3), (7, 8)] {
            let t = Topology::new(f, 5, 4, 2).unwrap();
            let p = NetworkParams::init(&t, &mut rng);
            let x = Matrix::standard_normal(n, f, &mut rng);
            let acts = forward(&x, &p);
            assert_eq!(acts.hidden1.shape(), (n, 5));
            assert_eq!(acts.hidden2.shape(), (n, 4));
            assert_eq!(acts.output.shape(), (n, 2));
        }
    }

    #[test]
    fn zero_weights_give_half_everywhere() {
        let p = NetworkParams::from_weights(
            Matrix::zeros(2, 3),
            Matrix::zeros(3, 3),
            Matrix::zeros(3, 1),
        )
        .unwrap();
        let x = Matrix::from_vec(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let acts = forward(&x, &p);
        assert!(acts.hidden1.iter().all(|&v| v == 0.5));
        // output = sigmoid(3 * 0.5 * 0) = 0.5
        assert!(acts.output.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn single_path_matches_hand_computation() {
        let p = NetworkParams::from_weights(
            Matrix::from_vec(1, 1, &[2.0]).unwrap(),
            Matrix::from_vec(1, 1, &[-1.0]).unwrap(),
            Matrix::from_vec(1, 1, &[0.5]).unwrap(),
        )
        .unwrap();
        let x = Matrix::from_vec(1, 1, &[1.0]).unwrap();
        let acts = forward(&x, &p);

        let h1 = 1.0 / (1.0 + (-2.0f64).exp());
        let h2 = 1.0 / (1.0 + h1.exp());
        let o = 1.0 / (1.0 + (-0.5 * h2).exp());
        assert_relative_eq!(acts.hidden1.get(0, 0), h1);
        assert_relative_eq!(acts.hidden2.get(0, 0), h2);
        assert_relative_eq!(acts.output.get(0, 0), o);
    }
}
