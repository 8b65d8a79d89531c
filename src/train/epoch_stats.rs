use serde::{Deserialize, Serialize};

/// Per-epoch statistics emitted by `Trainer::train`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the trainer
/// sends one `EpochStats` for every sampled epoch, after the error has been
/// recorded in the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean absolute output error measured during this epoch's forward pass.
    pub mean_abs_error: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
