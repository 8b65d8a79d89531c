use crate::error::ConfigError;
use crate::math::matrix::Matrix;

/// Feature matrix (N×F) paired with its target matrix (N×O).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Matrix,
    targets: Matrix,
}

impl Dataset {
    /// Pairs features with targets; both must have the same, non-zero row count.
    pub fn new(features: Matrix, targets: Matrix) -> Result<Dataset, ConfigError> {
        if features.rows == 0 {
            return Err(ConfigError::NoExamples);
        }
        if features.rows != targets.rows {
            return Err(ConfigError::LayerMismatch {
                what: "targets",
                expected: (features.rows, targets.cols),
                found: targets.shape(),
            });
        }
        Ok(Dataset { features, targets })
    }

    pub fn features(&self) -> &Matrix {
        &self.features
    }

    pub fn targets(&self) -> &Matrix {
        &self.targets
    }

    /// N
    pub fn examples(&self) -> usize {
        self.features.rows
    }

    /// F
    pub fn feature_count(&self) -> usize {
        self.features.cols
    }

    /// O
    pub fn target_count(&self) -> usize {
        self.targets.cols
    }
}
