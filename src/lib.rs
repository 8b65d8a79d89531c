pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod report;
pub mod config;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use network::{NetworkParams, Topology};
pub use loss::mae::MaeLoss;
pub use optim::sgd::{GradientScale, Sgd};
pub use train::{ErrorHistory, TrainConfig, TrainOutcome, Trainer, TrainerState};
pub use data::{AbaloneFile, DataSource, Dataset, RandomSource};
pub use config::RunConfig;
pub use error::{ConfigError, DataError, Error, ReportError, Result};
