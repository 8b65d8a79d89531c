use std::path::PathBuf;

/// Shape problems raised while building a `Matrix` from raw data.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MatrixError {
    #[error("matrix must have at least one row and one column")]
    Empty,

    #[error("row {row} has {found} columns, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },

    #[error("{rows}x{cols} matrix needs {expected} values, got {found}")]
    Length { rows: usize, cols: usize, expected: usize, found: usize },
}

/// Setup-time problems. These are never retried.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("example count must be greater than zero")]
    NoExamples,

    #[error("layer width `{layer}` must be greater than zero")]
    ZeroWidth { layer: &'static str },

    #[error("{what}: expected {expected:?}, got {found:?}")]
    LayerMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("learning rate must be finite and positive, got {0}")]
    InvalidLearningRate(f64),

    #[error("error sampling interval must be at least 1")]
    ZeroSampleInterval,

    #[error("expected {expected} hidden widths, got {found}")]
    HiddenLayers { expected: usize, found: usize },

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Problems found while reading training records.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DataError {
    #[error("line {line}, field {field}: '{value}' is not a valid number")]
    InvalidNumber { line: usize, field: usize, value: String },

    #[error("line {line}: unknown category code '{value}'")]
    UnknownCategory { line: usize, value: String },

    #[error("line {line}: {found} fields, expected {expected}")]
    RaggedRecord { line: usize, expected: usize, found: usize },

    #[error("line {line}: a record needs at least one feature and a target, got {found} fields")]
    TooFewFields { line: usize, found: usize },

    #[error("requested {requested} records but only {found} are available")]
    NotEnoughRecords { requested: usize, found: usize },

    #[error("cannot read {path}: {message}")]
    Unreadable { path: PathBuf, message: String },
}

/// Problems raised while writing reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("error history is empty, nothing to plot")]
    EmptyHistory,

    #[error("chart must be at least {min}x{min} pixels")]
    ChartTooSmall { min: u32 },

    #[error("failed to write chart: {0}")]
    Image(#[from] image::ImageError),

    #[error("history JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Crate-wide error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),

    #[error("invalid config file: {0}")]
    ConfigFile(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
