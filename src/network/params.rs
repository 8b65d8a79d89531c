use rand::Rng;

use crate::error::ConfigError;
use crate::math::matrix::Matrix;
use crate::network::topology::Topology;

/// The three weight matrices W1 (F×H1), W2 (H1×H2), W3 (H2×O).
///
/// Shapes are checked once on construction and never change: the optimizer
/// builds replacement matrices of identical shape each epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkParams {
    topology: Topology,
    w1: Matrix,
    w2: Matrix,
    w3: Matrix,
}

impl NetworkParams {
    /// Draws every weight independently from N(0, 1).
    ///
    /// Random rather than zero init so hidden units do not update in lockstep.
    pub fn init<R: Rng + ?Sized>(topology: &Topology, rng: &mut R) -> NetworkParams {
        let [s1, s2, s3] = topology.weight_shapes();
        NetworkParams {
            topology: *topology,
            w1: Matrix::standard_normal(s1.0, s1.1, rng),
            w2: Matrix::standard_normal(s2.0, s2.1, rng),
            w3: Matrix::standard_normal(s3.0, s3.1, rng),
        }
    }

    /// Wraps explicit weights after checking that W1.cols == W2.rows and
    /// W2.cols == W3.rows.
    pub fn from_weights(w1: Matrix, w2: Matrix, w3: Matrix) -> Result<NetworkParams, ConfigError> {
        if w1.cols != w2.rows {
            return Err(ConfigError::LayerMismatch {
                what: "W2",
                expected: (w1.cols, w2.cols),
                found: w2.shape(),
            });
        }
        if w2.cols != w3.rows {
            return Err(ConfigError::LayerMismatch {
                what: "W3",
                expected: (w2.cols, w3.cols),
                found: w3.shape(),
            });
        }
        let topology = Topology::new(w1.rows, w1.cols, w2.cols, w3.cols)?;

        Ok(NetworkParams { topology, w1, w2, w3 })
    }

    /// Installs a freshly computed weight triple of the same shapes.
    pub(crate) fn replaced(&self, w1: Matrix, w2: Matrix, w3: Matrix) -> NetworkParams {
        debug_assert_eq!(w1.shape(), self.w1.shape());
        debug_assert_eq!(w2.shape(), self.w2.shape());
        debug_assert_eq!(w3.shape(), self.w3.shape());
        NetworkParams { topology: self.topology, w1, w2, w3 }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn w1(&self) -> &Matrix {
        &self.w1
    }

    pub fn w2(&self) -> &Matrix {
        &self.w2
    }

    pub fn w3(&self) -> &Matrix {
        &self.w3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn init_uses_topology_shapes() {
        let t = Topology::new(3, 5, 4, 2).unwrap();
        let p = NetworkParams::init(&t, &mut StdRng::seed_from_u64(1));
        assert_eq!(p.w1().shape(), (3, 5));
        assert_eq!(p.w2().shape(), (5, 4));
        assert_eq!(p.w3().shape(), (4, 2));
        assert_eq!(p.topology(), &t);
    }

    #[test]
    fn init_breaks_symmetry() {
        let t = Topology::new(3, 5, 5, 1).unwrap();
        let p = NetworkParams::init(&t, &mut StdRng::seed_from_u64(1));
        let first = p.w1().get(0, 0);
        assert!(p.w1().iter().any(|&w| w != first));
    }

    #[test]
    fn from_weights_checks_chaining() {
        let err = NetworkParams::from_weights(
            Matrix::zeros(3, 5),
            Matrix::zeros(4, 5),
            Matrix::zeros(5, 1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::LayerMismatch { what: "W2", expected: (5, 5), found: (4, 5) }
        );

        let err = NetworkParams::from_weights(
            Matrix::zeros(3, 5),
            Matrix::zeros(5, 2),
            Matrix::zeros(5, 1),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::LayerMismatch { what: "W3", .. }));
    }

    #[test]
    fn from_weights_derives_topology() {
        let p = NetworkParams::from_weights(
            Matrix::zeros(8, 5),
            Matrix::zeros(5, 3),
            Matrix::zeros(3, 1),
        )
        .unwrap();
        assert_eq!(*p.topology(), Topology::new(8, 5, 3, 1).unwrap());
    }
}
