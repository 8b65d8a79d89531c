use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// One recorded point of the error trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorSample {
    pub epoch: usize,
    #[serde(with = "non_finite")]
    pub mean_abs_error: f64,
}

/// JSON has no NaN or infinity. Finite values stay numbers; the others are
/// written as the strings `"NaN"`, `"inf"` and `"-inf"`.
mod non_finite {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) => match s.as_str() {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("'{other}' is not an error value"))),
            },
        }
    }
}

/// Append-only, epoch-ordered record of sampled training errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorHistory {
    samples: Vec<ErrorSample>,
}

impl ErrorHistory {
    pub fn new() -> ErrorHistory {
        ErrorHistory::default()
    }

    /// # Panics
    /// Panics in debug builds if `epoch` does not come after the last recorded one.
    pub fn record(&mut self, epoch: usize, mean_abs_error: f64) {
        debug_assert!(self.samples.last().map_or(true, |s| s.epoch < epoch));
        self.samples.push(ErrorSample { epoch, mean_abs_error });
    }

    pub fn samples(&self) -> &[ErrorSample] {
        &self.samples
    }

    /// Error values in epoch order.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.mean_abs_error).collect()
    }

    pub fn first(&self) -> Option<&ErrorSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&ErrorSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Writes the history as pretty-printed JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a history previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<ErrorHistory, ReportError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
