//! Dataset Module - Training Data for the Detector
//!
//! Holds the historical flow table the normalizer and the forest are fitted
//! on. Loaded once at startup, immutable afterwards.

pub mod loader;

#[cfg(test)]
mod tests;

use ndarray::Array2;
use std::path::Path;

use crate::error::{DetectorError, Result};
use crate::logic::features::{FEATURE_COUNT, FEATURE_LAYOUT};

/// Immutable (rows x FEATURE_COUNT) training matrix in layout order
#[derive(Debug, Clone)]
pub struct TrainingDataset {
    features: Array2<f64>,
}

impl TrainingDataset {
    /// Wrap an existing matrix. Columns must follow `FEATURE_LAYOUT`.
    pub fn from_matrix(features: Array2<f64>) -> Result<Self> {
        if features.ncols() != FEATURE_COUNT {
            return Err(DetectorError::InvalidConfig(format!(
                "training matrix has {} columns, expected {}",
                features.ncols(),
                FEATURE_COUNT
            )));
        }

        if let Some(((row, col), value)) = features.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(DetectorError::InvalidValue {
                column: FEATURE_LAYOUT[col].to_string(),
                row: row + 1,
                value: value.to_string(),
            });
        }

        Ok(Self { features })
    }

    /// Load a CSV file with at least the `FEATURE_LAYOUT` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        loader::load_csv_file(path.as_ref())
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.features.nrows() == 0
    }
}
