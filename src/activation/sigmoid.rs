use crate::math::matrix::Matrix;

/// Logistic sigmoid `1 / (1 + e^-v)`.
///
/// For large negative `v`, `exp(-v)` overflows to infinity and the result
/// is exactly 0.0; no guard is needed.
pub fn sigmoid(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}

/// Sigmoid slope expressed in terms of an already-activated value `a = sigmoid(z)`.
///
/// Callers must pass activations, not pre-activation sums.
pub fn sigmoid_derivative(a: f64) -> f64 {
    a * (1.0 - a)
}

/// Element-wise `sigmoid` over a matrix.
pub fn activate(m: &Matrix) -> Matrix {
    m.map(sigmoid)
}

/// Element-wise `sigmoid_derivative` over a matrix of activations.
pub fn activation_slope(activated: &Matrix) -> Matrix {
    activated.map(sigmoid_derivative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn sigmoid_of_zero_is_half() {
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn saturates_without_nan() {
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert_eq!(sigmoid(1000.0), 1.0);
    }

    #[test]
    fn slope_peaks_at_quarter() {
        assert_eq!(sigmoid_derivative(sigmoid(0.0)), 0.25);
    }

    #[test]
    fn matrix_helpers_keep_shape() {
        let m = Matrix::from_vec(2, 3, &[0.0, 1.0, -1.0, 2.0, -2.0, 0.5]).unwrap();
        let a = activate(&m);
        assert_eq!(a.shape(), (2, 3));
        assert_relative_eq!(a.get(0, 1), 0.7310585786300049);
        assert_eq!(activation_slope(&a).shape(), (2, 3));
    }

    proptest! {
        #[test]
        fn sigmoid_is_increasing(a in -30.0f64..30.0, delta in 0.001f64..5.0) {
            prop_assert!(sigmoid(a + delta) > sigmoid(a));
        }

        #[test]
        fn slope_of_activation_is_bounded(v in -1.0e6f64..1.0e6) {
            let d = sigmoid_derivative(sigmoid(v));
            prop_assert!((0.0..=0.25).contains(&d));
        }
    }
}
