//! Feature Normalizer - Standardization with fixed training statistics
//!
//! `(value - mean) / std` per feature, with std the sample standard
//! deviation (ddof = 1) of the training column.
//!
//! Constant columns (or a single training row) have no usable std. Those
//! features get a scale of 1.0, so the output is `value - mean` and always
//! finite.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, Result};
use crate::logic::dataset::TrainingDataset;
use super::layout::{layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
use super::vector::FeatureVector;

/// Relative tolerance below which a std counts as zero
const ZERO_STD_TOLERANCE: f64 = 10.0 * f64::EPSILON;

/// Per-feature mean/std of one feature
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureBound {
    pub name: String,
    pub mean: f64,
    pub std: f64,
}

/// Fitted standardization statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureStatistics {
    pub means: [f64; FEATURE_COUNT],
    /// Sample standard deviations as computed (may be zero)
    pub stds: [f64; FEATURE_COUNT],
    /// Divisors actually applied (std, or 1.0 for degenerate features)
    pub scales: [f64; FEATURE_COUNT],
    pub sample_count: usize,
    pub feature_version: u8,
    pub layout_hash: u32,
}

impl FeatureStatistics {
    /// Fit statistics over every row of the dataset
    pub fn fit(dataset: &TrainingDataset) -> Result<Self> {
        let matrix = dataset.features();
        let n = matrix.nrows();
        if n == 0 {
            return Err(DetectorError::EmptyDataset);
        }

        let mean_axis = matrix.mean_axis(Axis(0)).ok_or(DetectorError::EmptyDataset)?;
        let std_axis = if n >= 2 {
            matrix.std_axis(Axis(0), 1.0)
        } else {
            ndarray::Array1::zeros(FEATURE_COUNT)
        };

        let mut means = [0.0; FEATURE_COUNT];
        let mut stds = [0.0; FEATURE_COUNT];
        let mut scales = [1.0; FEATURE_COUNT];

        for i in 0..FEATURE_COUNT {
            means[i] = mean_axis[i];
            stds[i] = std_axis[i];

            if is_degenerate(stds[i], means[i]) {
                log::warn!(
                    "Feature '{}' has zero variance over {} rows - standardizing with scale 1.0",
                    FEATURE_LAYOUT[i],
                    n
                );
            } else {
                scales[i] = stds[i];
            }
        }

        log::info!("Feature statistics fitted over {} rows", n);

        Ok(Self {
            means,
            stds,
            scales,
            sample_count: n,
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
        })
    }

    /// Standardize one vector
    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, value) in vector.values.iter().enumerate() {
            out[i] = (value - self.means[i]) / self.scales[i];
        }
        FeatureVector::from(out)
    }

    /// Standardize every row of a (rows x FEATURE_COUNT) matrix
    pub fn transform_matrix(&self, matrix: &Array2<f64>) -> Array2<f64> {
        let mut out = matrix.to_owned();
        for mut row in out.rows_mut() {
            for (i, value) in row.iter_mut().enumerate() {
                *value = (*value - self.means[i]) / self.scales[i];
            }
        }
        out
    }

    /// True when the feature at `index` was fitted on a constant column
    pub fn is_degenerate(&self, index: usize) -> bool {
        index < FEATURE_COUNT && is_degenerate(self.stds[index], self.means[index])
    }

    /// Named mean/std table
    pub fn bounds(&self) -> Vec<FeatureBound> {
        FEATURE_LAYOUT
            .iter()
            .enumerate()
            .map(|(i, name)| FeatureBound {
                name: name.to_string(),
                mean: self.means[i],
                std: self.stds[i],
            })
            .collect()
    }
}

fn is_degenerate(std: f64, mean: f64) -> bool {
    !std.is_finite() || std <= ZERO_STD_TOLERANCE * mean.abs().max(1.0)
}
