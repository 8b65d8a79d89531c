use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::data::dataset::Dataset;
use crate::data::source::DataSource;
use crate::error::{ConfigError, Error};
use crate::loss::mae::MaeLoss;
use crate::network::backward::backward;
use crate::network::forward::forward;
use crate::network::params::NetworkParams;
use crate::network::topology::Topology;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::history::ErrorHistory;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// One epoch
// ---------------------------------------------------------------------------

/// Weights after one epoch plus the error measured during it.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochResult {
    pub params: NetworkParams,
    pub mean_abs_error: f64,
}

/// Forward, loss, backward and update over the full dataset.
///
/// Deterministic: the same `params` and `dataset` always produce bit-identical
/// results. Every intermediate matrix is local to this call.
pub fn epoch_step(dataset: &Dataset, params: &NetworkParams, optimizer: &Sgd) -> EpochResult {
    let acts = forward(dataset.features(), params);
    let error = MaeLoss::error(&acts.output, dataset.targets());
    let mean_abs_error = MaeLoss::loss(&error);
    let deltas = backward(&error, &acts, params);
    let params = optimizer.step(params, dataset.features(), &acts, &deltas);

    EpochResult { params, mean_abs_error }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    /// Data and weights are in place, no epoch has run.
    Initializing,
    Training,
    /// All configured epochs ran.
    Exhausted,
    /// Stopped between epochs by the stop flag or a dropped progress receiver.
    Cancelled,
}

/// What a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub params: NetworkParams,
    pub history: ErrorHistory,
    pub epochs_run: usize,
    pub state: TrainerState,
}

/// Owns the dataset, the weight triple and the error history for one run.
pub struct Trainer {
    dataset: Dataset,
    params: NetworkParams,
    optimizer: Sgd,
    config: TrainConfig,
    history: ErrorHistory,
    state: TrainerState,
    next_epoch: usize,
    warned_non_finite: bool,
}

impl Trainer {
    /// Validates that `dataset` fits `params` and that `config` is usable.
    ///
    /// Every shape used by the epoch loop is fixed here, so the loop itself
    /// cannot hit a dimension mismatch.
    pub fn new(dataset: Dataset, params: NetworkParams, config: TrainConfig) -> Result<Trainer, ConfigError> {
        let optimizer = config.optimizer()?;
        let topology = params.topology();

        if dataset.examples() == 0 {
            return Err(ConfigError::NoExamples);
        }
        if dataset.feature_count() != topology.inputs {
            return Err(ConfigError::LayerMismatch {
                what: "features vs W1",
                expected: (dataset.examples(), topology.inputs),
                found: dataset.features().shape(),
            });
        }
        if dataset.target_count() != topology.outputs {
            return Err(ConfigError::LayerMismatch {
                what: "targets vs W3",
                expected: (dataset.examples(), topology.outputs),
                found: dataset.targets().shape(),
            });
        }

        Ok(Trainer {
            dataset,
            params,
            optimizer,
            config,
            history: ErrorHistory::new(),
            state: TrainerState::Initializing,
            next_epoch: 0,
            warned_non_finite: false,
        })
    }

    /// Loads `examples` rows from `source`, then draws initial weights sized to
    /// the data and the two hidden widths.
    ///
    /// Data errors surface before any weight matrix exists.
    pub fn initialize<S, R>(
        source: &S,
        examples: usize,
        hidden: (usize, usize),
        config: TrainConfig,
        rng: &mut R,
    ) -> Result<Trainer, Error>
    where
        S: DataSource + ?Sized,
        R: Rng + ?Sized,
    {
        config.optimizer()?;
        let dataset = source.load(examples)?;
        let topology = Topology::new(
            dataset.feature_count(),
            hidden.0,
            hidden.1,
            dataset.target_count(),
        )?;
        let params = NetworkParams::init(&topology, rng);
        info!(
            examples = dataset.examples(),
            features = topology.inputs,
            hidden1 = topology.hidden1,
            hidden2 = topology.hidden2,
            outputs = topology.outputs,
            "initialized network"
        );

        Ok(Trainer::new(dataset, params, config)?)
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn history(&self) -> &ErrorHistory {
        &self.history
    }

    /// Epochs completed so far.
    pub fn epochs_run(&self) -> usize {
        self.next_epoch
    }

    /// Runs the next epoch and returns its mean absolute error.
    ///
    /// Returns `None` without touching the weights when every configured
    /// epoch has run, the stop flag is set, or the trainer was already
    /// cancelled. A dropped progress receiver cancels the trainer after the
    /// epoch completes, so its weights are kept.
    pub fn step(&mut self) -> Option<f64> {
        if self.state == TrainerState::Cancelled || self.next_epoch >= self.config.epochs {
            return None;
        }
        if self.stop_requested() {
            self.state = TrainerState::Cancelled;
            return None;
        }
        self.state = TrainerState::Training;

        let epoch = self.next_epoch;
        let t_start = Instant::now();
        let EpochResult { params, mean_abs_error } =
            epoch_step(&self.dataset, &self.params, &self.optimizer);
        self.params = params;
        self.next_epoch += 1;

        if !mean_abs_error.is_finite() && !self.warned_non_finite {
            warn!(epoch, error = mean_abs_error, "training error is no longer finite");
            self.warned_non_finite = true;
        }

        if !self.config.is_sampled(epoch) {
            return Some(mean_abs_error);
        }

        self.history.record(epoch, mean_abs_error);
        debug!(epoch, error = mean_abs_error, "epoch sampled");

        if let Some(ref tx) = self.config.progress_tx {
            let stats = EpochStats {
                epoch,
                total_epochs: self.config.epochs,
                mean_abs_error,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                self.state = TrainerState::Cancelled;
            }
        }

        Some(mean_abs_error)
    }

    /// Runs the remaining epochs and returns the final weights and history.
    ///
    /// # Early termination
    /// The loop stops before starting the next epoch if:
    /// - `config.stop_flag` is set, **or**
    /// - the `progress_tx` receiver has been dropped.
    ///
    /// Non-finite errors are recorded as-is so divergence stays visible.
    pub fn train(mut self) -> TrainOutcome {
        info!(
            epochs = self.config.epochs,
            learning_rate = self.optimizer.learning_rate(),
            gradient_scale = ?self.optimizer.scale(),
            sample_every = self.config.sample_every,
            "training started"
        );

        while self.step().is_some() {}

        if self.state != TrainerState::Cancelled {
            self.state = TrainerState::Exhausted;
        }

        info!(
            epochs_run = self.next_epoch,
            state = ?self.state,
            final_error = ?self.history.last().map(|s| s.mean_abs_error),
            "training finished"
        );

        TrainOutcome {
            params: self.params,
            history: self.history,
            epochs_run: self.next_epoch,
            state: self.state,
        }
    }

    fn stop_requested(&self) -> bool {
        self.config
            .stop_flag
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::RandomSource;
    use crate::math::matrix::Matrix;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::{atomic::AtomicBool, mpsc, Arc};

    fn trainer(epochs: usize) -> Trainer {
        let mut rng = StdRng::seed_from_u64(7);
        Trainer::initialize(
            &RandomSource::new(3, 2, 7),
            4,
            (5, 5),
            TrainConfig::new(epochs, 1.0),
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn zero_epochs_leave_weights_untouched() {
        let t = trainer(0);
        assert_eq!(t.state(), TrainerState::Initializing);
        let before = t.params().clone();
        let out = t.train();
        assert_eq!(out.params, before);
        assert!(out.history.is_empty());
        assert_eq!(out.epochs_run, 0);
        assert_eq!(out.state, TrainerState::Exhausted);
    }

    #[test]
    fn epoch_step_is_deterministic() {
        let t = trainer(1);
        let sgd = Sgd::new(1.0, Default::default()).unwrap();
        let a = epoch_step(t.dataset(), t.params(), &sgd);
        let b = epoch_step(t.dataset(), t.params(), &sgd);
        assert_eq!(a, b);
    }

    #[test]
    fn history_follows_sample_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let t = Trainer::initialize(
            &RandomSource::new(3, 1, 7),
            4,
            (5, 5),
            TrainConfig::new(10, 1.0).with_sample_every(4),
            &mut rng,
        )
        .unwrap();
        let out = t.train();
        let epochs: Vec<usize> = out.history.samples().iter().map(|s| s.epoch).collect();
        assert_eq!(epochs, vec![0, 4, 8]);
        assert_eq!(out.epochs_run, 10);
    }

    #[test]
    fn stop_flag_cancels_before_first_epoch() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut rng = StdRng::seed_from_u64(7);
        let t = Trainer::initialize(
            &RandomSource::new(3, 2, 7),
            4,
            (5, 5),
            TrainConfig::new(50, 1.0).with_stop_flag(flag),
            &mut rng,
        )
        .unwrap();
        let before = t.params().clone();
        let out = t.train();
        assert_eq!(out.state, TrainerState::Cancelled);
        assert_eq!(out.epochs_run, 0);
        assert_eq!(out.params, before);
    }

    #[test]
    fn stop_flag_between_epochs_keeps_last_completed_weights() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut rng = StdRng::seed_from_u64(7);
        let mut t = Trainer::initialize(
            &RandomSource::new(3, 2, 7),
            4,
            (5, 5),
            TrainConfig::new(50, 1.0).with_stop_flag(flag.clone()),
            &mut rng,
        )
        .unwrap();

        let sgd = Sgd::new(1.0, Default::default()).unwrap();
        let mut expected = t.params().clone();
        let completed = 3;
        for _ in 0..completed {
            assert!(t.step().is_some());
            expected = epoch_step(t.dataset(), &expected, &sgd).params;
        }
        assert_eq!(t.state(), TrainerState::Training);
        assert_eq!(t.epochs_run(), completed);

        flag.store(true, Ordering::Relaxed);
        let out = t.train();
        assert_eq!(out.state, TrainerState::Cancelled);
        assert_eq!(out.epochs_run, completed);
        assert_eq!(out.history.len(), completed);
        assert_eq!(out.params, expected);
    }

    #[test]
    fn step_stops_once_epochs_are_exhausted() {
        let mut t = trainer(2);
        assert!(t.step().is_some());
        assert!(t.step().is_some());
        let after = t.params().clone();
        assert_eq!(t.step(), None);
        assert_eq!(t.params(), &after);
        let out = t.train();
        assert_eq!(out.state, TrainerState::Exhausted);
        assert_eq!(out.epochs_run, 2);
    }

    #[test]
    fn progress_channel_receives_each_sample() {
        let (tx, rx) = mpsc::channel();
        let mut rng = StdRng::seed_from_u64(7);
        let t = Trainer::initialize(
            &RandomSource::new(3, 2, 7),
            4,
            (5, 5),
            TrainConfig::new(6, 1.0).with_sample_every(2).with_progress(tx),
            &mut rng,
        )
        .unwrap();
        let out = t.train();
        let stats: Vec<EpochStats> = rx.try_iter().collect();
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[2].epoch, 4);
        assert_eq!(stats[2].total_epochs, 6);
        assert_eq!(stats[1].mean_abs_error, out.history.values()[1]);
    }

    #[test]
    fn dropped_receiver_stops_after_first_sample() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut rng = StdRng::seed_from_u64(7);
        let t = Trainer::initialize(
            &RandomSource::new(3, 2, 7),
            4,
            (5, 5),
            TrainConfig::new(20, 1.0).with_progress(tx),
            &mut rng,
        )
        .unwrap();
        let out = t.train();
        assert_eq!(out.state, TrainerState::Cancelled);
        assert_eq!(out.epochs_run, 1);
        assert_eq!(out.history.len(), 1);
    }

    #[test]
    fn rejects_feature_width_mismatch() {
        let ds = Dataset::new(Matrix::zeros(4, 3), Matrix::zeros(4, 1)).unwrap();
        let params = NetworkParams::init(
            &Topology::new(2, 5, 5, 1).unwrap(),
            &mut StdRng::seed_from_u64(1),
        );
        let err = Trainer::new(ds, params, TrainConfig::new(1, 1.0)).err().unwrap();
        assert!(matches!(err, ConfigError::LayerMismatch { what: "features vs W1", .. }));
    }

    #[test]
    fn rejects_target_width_mismatch() {
        let ds = Dataset::new(Matrix::zeros(4, 3), Matrix::zeros(4, 2)).unwrap();
        let params = NetworkParams::init(
            &Topology::new(3, 5, 5, 1).unwrap(),
            &mut StdRng::seed_from_u64(1),
        );
        let err = Trainer::new(ds, params, TrainConfig::new(1, 1.0)).err().unwrap();
        assert!(matches!(err, ConfigError::LayerMismatch { what: "targets vs W3", .. }));
    }

    #[test]
    fn divergence_is_recorded_not_hidden() {
        let ds = Dataset::new(
            Matrix::from_vec(2, 1, &[1.0, f64::NAN]).unwrap(),
            Matrix::from_vec(2, 1, &[0.5, 0.5]).unwrap(),
        )
        .unwrap();
        let params = NetworkParams::init(
            &Topology::new(1, 2, 2, 1).unwrap(),
            &mut StdRng::seed_from_u64(1),
        );
        let out = Trainer::new(ds, params, TrainConfig::new(3, 1.0)).unwrap().train();
        assert_eq!(out.history.len(), 3);
        assert!(out.history.values().iter().all(|v| v.is_nan()));
        assert_eq!(out.state, TrainerState::Exhausted);
    }
}
