use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::error::ConfigError;
use crate::optim::sgd::{GradientScale, Sgd};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `Trainer` run.
///
/// # Fields
/// - `epochs`         — fixed number of full-batch epochs; there is no early stop on convergence
/// - `learning_rate`  — step size η, must be finite and > 0
/// - `sample_every`   — record the error every Nth epoch (epoch 0 is always recorded)
/// - `gradient_scale` — raw summed gradient or per-example mean
/// - `progress_tx`    — optional channel; one `EpochStats` per sampled epoch.
///                      If the receiver is dropped the run stops after that epoch.
/// - `stop_flag`      — optional atomic flag, checked before each epoch starts.
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub sample_every: usize,
    pub gradient_scale: GradientScale,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` that samples every epoch, uses the summed
    /// gradient, and has no progress channel or stop flag.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            sample_every: 1,
            gradient_scale: GradientScale::Sum,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_sample_every(mut self, sample_every: usize) -> Self {
        self.sample_every = sample_every;
        self
    }

    pub fn with_gradient_scale(mut self, gradient_scale: GradientScale) -> Self {
        self.gradient_scale = gradient_scale;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    /// Checks the numeric settings and builds the optimizer they describe.
    pub fn optimizer(&self) -> Result<Sgd, ConfigError> {
        if self.sample_every == 0 {
            return Err(ConfigError::ZeroSampleInterval);
        }
        Sgd::new(self.learning_rate, self.gradient_scale)
    }

    pub(crate) fn is_sampled(&self, epoch: usize) -> bool {
        epoch % self.sample_every == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_sample_interval() {
        let cfg = TrainConfig::new(10, 1.0).with_sample_every(0);
        assert_eq!(cfg.optimizer().unwrap_err(), ConfigError::ZeroSampleInterval);
    }

    #[test]
    fn rejects_non_positive_learning_rate() {
        let cfg = TrainConfig::new(10, 0.0);
        assert_eq!(cfg.optimizer().unwrap_err(), ConfigError::InvalidLearningRate(0.0));
    }

    #[test]
    fn sampling_interval() {
        let cfg = TrainConfig::new(10, 1.0).with_sample_every(3);
        let sampled: Vec<usize> = (0..10).filter(|&e| cfg.is_sampled(e)).collect();
        assert_eq!(sampled, vec![0, 3, 6, 9]);
    }
}
