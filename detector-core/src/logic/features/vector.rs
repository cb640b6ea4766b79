//! Feature Vector - Core data structure for model input
//!
//! Values are ordered by `FEATURE_LAYOUT`.

use serde::{Deserialize, Serialize};
use super::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT};

/// Fixed-size feature vector in layout order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create a zeroed feature vector
    pub fn new() -> Self {
        Self { values: [0.0; FEATURE_COUNT] }
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Get values as array reference
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// True when no value is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// (name, value) pairs for logging
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        FEATURE_LAYOUT.iter().copied().zip(self.values.iter().copied()).collect()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}
