//! Reader for the UCI abalone record format.
//!
//! Format:
//! - one comma-separated record per line, no header
//! - field 0 is the sex category: `I`, `M` or `F`
//! - the remaining fields are numeric
//! - the last field (ring count) is the regression target
//!
//! The category is mapped to a numeric code and the target is divided by 20
//! so it sits in the range a sigmoid output can reach.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::data::dataset::Dataset;
use crate::data::source::DataSource;
use crate::error::{ConfigError, DataError, Error};
use crate::math::matrix::Matrix;

/// Divisor applied to the ring count target.
pub const TARGET_SCALE: f64 = 20.0;

/// Numeric code for a sex category token.
fn category_code(token: &str) -> Option<f64> {
    match token {
        "I" => Some(0.33),
        "M" => Some(0.66),
        "F" => Some(1.0),
        _ => None,
    }
}

/// Abalone records stored in a file on disk.
#[derive(Debug, Clone)]
pub struct AbaloneFile {
    path: PathBuf,
}

impl AbaloneFile {
    pub fn new(path: impl Into<PathBuf>) -> AbaloneFile {
        AbaloneFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for AbaloneFile {
    fn read(&self, examples: usize) -> Result<Dataset, Error> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| DataError::Unreadable {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %self.path.display(), bytes = text.len(), "read abalone data");
        parse_records(&text, examples)
    }
}

/// Parses the first `examples` records of `text` into a dataset.
///
/// Blank lines are skipped. Every record must have the same field count as
/// the first one.
pub fn parse_records(text: &str, examples: usize) -> Result<Dataset, Error> {
    if examples == 0 {
        return Err(ConfigError::NoExamples.into());
    }

    let mut features: Vec<f64> = Vec::new();
    let mut targets: Vec<f64> = Vec::new();
    let mut width: Option<usize> = None;

    let records = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .take(examples);

    for (line_no, line) in records {
        let values = parse_record(line, line_no)?;

        let expected = *width.get_or_insert(values.len());
        if values.len() != expected {
            return Err(DataError::RaggedRecord {
                line: line_no,
                expected,
                found: values.len(),
            }
            .into());
        }

        let (target, feats) = values.split_last().ok_or(DataError::TooFewFields {
            line: line_no,
            found: 0,
        })?;
        features.extend_from_slice(feats);
        targets.push(target / TARGET_SCALE);
    }

    if targets.len() < examples {
        return Err(DataError::NotEnoughRecords {
            requested: examples,
            found: targets.len(),
        }
        .into());
    }

    let feature_count = width.map(|w| w - 1).unwrap_or(0);
    let features = Matrix::from_vec(examples, feature_count, &features)
        .map_err(ConfigError::from)?;
    let targets = Matrix::from_vec(examples, 1, &targets).map_err(ConfigError::from)?;

    Ok(Dataset::new(features, targets)?)
}

/// Parses one record into floats, mapping the category field.
fn parse_record(line: &str, line_no: usize) -> Result<Vec<f64>, DataError> {
    let cells: Vec<&str> = line.split(',').map(str::trim).collect();
    if cells.len() < 2 {
        return Err(DataError::TooFewFields { line: line_no, found: cells.len() });
    }

    let sex = category_code(cells[0]).ok_or_else(|| DataError::UnknownCategory {
        line: line_no,
        value: cells[0].to_string(),
    })?;

    let mut values = Vec::with_capacity(cells.len());
    values.push(sex);
    for (field, cell) in cells.iter().enumerate().skip(1) {
        let v = cell.parse::<f64>().map_err(|_| DataError::InvalidNumber {
            line: line_no,
            field: field + 1,
            value: cell.to_string(),
        })?;
        values.push(v);
    }
    Ok(values)
}
