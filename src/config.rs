use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error};
use crate::optim::sgd::GradientScale;
use crate::train::train_config::TrainConfig;

pub const DEFAULT_EXAMPLES: usize = 100;
pub const DEFAULT_HIDDEN: [usize; 2] = [5, 5];
pub const DEFAULT_EPOCHS: usize = 1000;
pub const DEFAULT_LEARNING_RATE: f64 = 1.0;
pub const DEFAULT_CHART: &str = "error.png";

/// Run configuration. Also defines the JSON config file format; every field
/// may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Abalone data file. Random data is used when absent.
    pub data: Option<PathBuf>,
    pub examples: Option<usize>,
    /// Widths of the two hidden layers.
    pub hidden: Option<Vec<usize>>,
    /// Features per example for random data.
    pub features: Option<usize>,
    /// Output width for random data. The abalone file always has one target.
    pub outputs: Option<usize>,
    pub epochs: Option<usize>,
    pub learning_rate: Option<f64>,
    pub sample_every: Option<usize>,
    pub gradient_scale: Option<GradientScale>,
    pub seed: Option<u64>,
    pub chart: Option<PathBuf>,
    pub history: Option<PathBuf>,
}

impl RunConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig, Error> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    // merge configs where the second overwrites the first
    pub fn merge(self, other: Self) -> Self {
        Self {
            data: other.data.or(self.data),
            examples: other.examples.or(self.examples),
            hidden: other.hidden.or(self.hidden),
            features: other.features.or(self.features),
            outputs: other.outputs.or(self.outputs),
            epochs: other.epochs.or(self.epochs),
            learning_rate: other.learning_rate.or(self.learning_rate),
            sample_every: other.sample_every.or(self.sample_every),
            gradient_scale: other.gradient_scale.or(self.gradient_scale),
            seed: other.seed.or(self.seed),
            chart: other.chart.or(self.chart),
            history: other.history.or(self.history),
        }
    }

    pub fn examples(&self) -> usize {
        self.examples.unwrap_or(DEFAULT_EXAMPLES)
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(0)
    }

    /// The two hidden widths; anything other than exactly two is rejected.
    pub fn hidden(&self) -> Result<(usize, usize), ConfigError> {
        match self.hidden.as_deref().unwrap_or(&DEFAULT_HIDDEN) {
            [h1, h2] => Ok((*h1, *h2)),
            other => Err(ConfigError::HiddenLayers { expected: 2, found: other.len() }),
        }
    }

    pub fn chart_path(&self) -> PathBuf {
        self.chart.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CHART))
    }

    /// Builds the trainer settings. The returned config has no progress
    /// channel or stop flag attached.
    pub fn train_config(&self) -> Result<TrainConfig, ConfigError> {
        let config = TrainConfig::new(
            self.epochs.unwrap_or(DEFAULT_EPOCHS),
            self.learning_rate.unwrap_or(DEFAULT_LEARNING_RATE),
        )
        .with_sample_every(self.sample_every.unwrap_or(1))
        .with_gradient_scale(self.gradient_scale.unwrap_or_default());
        config.optimizer()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_baseline_run() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.examples(), 100);
        assert_eq!(cfg.hidden().unwrap(), (5, 5));
        let tc = cfg.train_config().unwrap();
        assert_eq!(tc.epochs, 1000);
        assert_eq!(tc.learning_rate, 1.0);
        assert_eq!(tc.sample_every, 1);
        assert_eq!(tc.gradient_scale, GradientScale::Sum);
        assert_eq!(cfg.chart_path(), PathBuf::from("error.png"));
    }

    #[test]
    fn second_config_wins_on_merge() {
        let file = RunConfig { epochs: Some(10), seed: Some(3), ..RunConfig::default() };
        let flags = RunConfig { epochs: Some(20), ..RunConfig::default() };
        let merged = file.merge(flags);
        assert_eq!(merged.epochs, Some(20));
        assert_eq!(merged.seed, Some(3));
    }

    #[test]
    fn parses_json_with_missing_fields() {
        let cfg: RunConfig = serde_json::from_str(
            r#"{ "examples": 4, "hidden": [3, 2], "gradient_scale": "mean" }"#,
        )
        .unwrap();
        assert_eq!(cfg.examples(), 4);
        assert_eq!(cfg.hidden().unwrap(), (3, 2));
        assert_eq!(cfg.gradient_scale, Some(GradientScale::Mean));
        assert!(serde_json::from_str::<RunConfig>(r#"{ "epoch": 3 }"#).is_err());
    }

    #[test]
    fn rejects_wrong_hidden_count_and_bad_rate() {
        let cfg = RunConfig { hidden: Some(vec![5]), ..RunConfig::default() };
        assert_eq!(cfg.hidden().unwrap_err(), ConfigError::HiddenLayers { expected: 2, found: 1 });

        let cfg = RunConfig { learning_rate: Some(-1.0), ..RunConfig::default() };
        assert!(matches!(cfg.train_config(), Err(ConfigError::InvalidLearningRate(_))));
    }
}
