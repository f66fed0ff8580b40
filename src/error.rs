use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the network, its persistence layer and the dataset loader.
///
/// Everything here aborts the current operation. Recoverable conditions (for
/// example a classification input of the wrong width) are logged with
/// `log::warn!` instead and never surface as an error.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("cannot access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dimension mismatch in {op}: left is {left:?}, right is {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("invalid network structure: {0}")]
    InvalidStructure(String),

    #[error("malformed parameter file at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("malformed dataset at line {line}: {message}")]
    Dataset { line: usize, message: String },

    #[error("sample {index} does not fit the network: {message}")]
    Sample { index: usize, message: String },

    #[error("label {label} is out of range for {classes} classes")]
    LabelOutOfRange { label: usize, classes: usize },

    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NetworkError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
