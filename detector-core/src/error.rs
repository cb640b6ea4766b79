//! Error handling

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DetectorError>;

#[derive(Debug, Error)]
pub enum DetectorError {
    // Dataset errors
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("dataset has no rows")]
    EmptyDataset,

    // Model errors
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Request errors
    #[error("invalid input for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    #[error("unknown protocol '{0}' (expected TCP, UDP or ICMP)")]
    UnknownProtocol(String),
}

impl DetectorError {
    /// True when the error was caused by the caller's input rather than by
    /// the dataset or the model.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DetectorError::InvalidInput { .. } | DetectorError::UnknownProtocol(_)
        )
    }
}
