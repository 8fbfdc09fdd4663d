use std::path::PathBuf;

use crate::task::Task;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while training or serving a model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unexpected header in {}: {reason}", .path.display())]
    Header { path: PathBuf, reason: String },
    #[error("Invalid value {value:?} in {}, row {row}, column {column}", .path.display())]
    Parse {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },
    #[error("Dataset {} contains no samples", .0.display())]
    EmptyDataset(PathBuf),
    #[error("Cannot split {rows} samples with test ratio {ratio}")]
    TooFewSamples { rows: usize, ratio: f64 },
    /// A vector or matrix does not have the width the fitted state expects.
    #[error("Expected {expected} values, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    /// A matrix with no rows or no columns where fitted state is required.
    #[error("Input has no samples or no features")]
    EmptyInput,
    #[error("Feature {feature} must be a finite number, got {value}")]
    NonFinite { feature: String, value: f64 },
    #[error("Training labels contain a single class")]
    SingleClass,
    #[error("SVM training failed: {0}")]
    Svm(#[from] linfa_svm::SvmError),
    #[error("Could not encode or decode artifact: {0}")]
    Codec(#[from] bincode::Error),
    #[error("Artifact {} has format version {found}, expected {expected}", .path.display())]
    ArtifactVersion {
        path: PathBuf,
        found: u16,
        expected: u16,
    },
    #[error("Artifact {} belongs to task {found}, expected {expected}", .path.display())]
    ArtifactTask {
        path: PathBuf,
        found: Task,
        expected: Task,
    },
    #[error("Scaler from run {scaler} does not match model from run {model}")]
    ArtifactRun { scaler: String, model: String },
    /// The artifacts for this task were not loaded at startup.
    #[error("No model is available for {0}")]
    ModelUnavailable(Task),
    #[error("Could not parse config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Could not write report: {0}")]
    Report(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("{0}")]
    Usage(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
