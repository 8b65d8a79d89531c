pub mod epoch_stats;
pub mod history;
pub mod loop_fn;
pub mod train_config;

pub use epoch_stats::EpochStats;
pub use history::{ErrorHistory, ErrorSample};
pub use loop_fn::{epoch_step, EpochResult, TrainOutcome, Trainer, TrainerState};
pub use train_config::TrainConfig;
