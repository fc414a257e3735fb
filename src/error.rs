use std::path::PathBuf;
use thiserror::Error;

use crate::table::Field;

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum FundingError {
    /// Input file is absent. Fatal at startup.
    #[error("CSV file not found at path: {}", path.display())]
    NotFound { path: PathBuf },

    /// Input file exists but is not usable tabular data. Fatal at startup.
    #[error("Error parsing CSV file at path: {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("column `{0}` is not present in the dataset")]
    MissingColumn(Field),

    /// Aggregation over an empty (or all-null) slice. Recoverable.
    #[error("no data available: {0}")]
    InsufficientData(String),

    #[error("quantile {0} is outside [0, 1]")]
    InvalidQuantile(f64),

    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl FundingError {
    pub fn insufficient(what: impl Into<String>) -> Self {
        FundingError::InsufficientData(what.into())
    }

    /// Errors the caller must halt on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FundingError::NotFound { .. } | FundingError::Parse { .. } | FundingError::Config { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FundingError>;
