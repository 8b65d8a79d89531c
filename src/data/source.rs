use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::data::dataset::Dataset;
use crate::error::{ConfigError, Error};
use crate::math::matrix::Matrix;

/// Supplies validated training matrices for a requested example count.
pub trait DataSource {
    /// Produces exactly `examples` rows or fails. Called with `examples > 0`.
    fn read(&self, examples: usize) -> Result<Dataset, Error>;

    /// Rejects a zero example count before touching the underlying source.
    fn load(&self, examples: usize) -> Result<Dataset, Error> {
        if examples == 0 {
            return Err(ConfigError::NoExamples.into());
        }
        self.read(examples)
    }
}

/// Synthetic data: standard normal inputs, uniform (0, 1) targets.
#[derive(Debug, Clone, Copy)]
pub struct RandomSource {
    pub features: usize,
    pub outputs: usize,
    pub seed: u64,
}

impl RandomSource {
    pub fn new(features: usize, outputs: usize, seed: u64) -> RandomSource {
        RandomSource { features, outputs, seed }
    }
}

impl DataSource for RandomSource {
    fn read(&self, examples: usize) -> Result<Dataset, Error> {
        if self.features == 0 {
            return Err(ConfigError::ZeroWidth { layer: "inputs" }.into());
        }
        if self.outputs == 0 {
            return Err(ConfigError::ZeroWidth { layer: "outputs" }.into());
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let features = Matrix::standard_normal(examples, self.features, &mut rng);
        let targets: Vec<f64> = (0..examples * self.outputs)
            .map(|_| rng.gen_range(f64::EPSILON..1.0))
            .collect();
        let targets = Matrix::from_vec(examples, self.outputs, &targets).map_err(ConfigError::from)?;

        Ok(Dataset::new(features, targets)?)
    }
}
