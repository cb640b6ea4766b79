//! Flow Classifier
//!
//! Input: FlowRecord
//! Output: ScoredResult
//!
//! The verdict combines the forest score with the rate rules of
//! `ThresholdConfig`. A flow is normal only if every rule passes.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logic::dataset::TrainingDataset;
use crate::logic::features::{
    FeatureBound, FeatureStatistics, FlowMetrics, FlowRecord, LayoutInfo,
};
use super::forest::{ForestConfig, IsolationForest};
use super::threshold::{RuleViolation, ThresholdConfig};

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Outcome of classifying one flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    /// Forest score, higher = more normal
    pub anomaly_score: f64,
    pub is_anomaly: bool,

    pub total_bytes: u64,
    pub bytes_per_packet: f64,
    pub bytes_per_second: f64,
    pub packets_per_second: f64,

    /// Contamination offset of the forest
    pub offset: f64,
    /// Score below the offset (informational, does not affect the verdict)
    pub model_outlier: bool,

    pub violations: Vec<RuleViolation>,
    pub reasons: Vec<String>,
}

impl ScoredResult {
    pub fn metrics(&self) -> FlowMetrics {
        FlowMetrics {
            total_bytes: self.total_bytes,
            bytes_per_packet: self.bytes_per_packet,
            bytes_per_second: self.bytes_per_second,
            packets_per_second: self.packets_per_second,
        }
    }
}

/// Description of the fitted model for status endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub dataset_rows: usize,
    pub bounds: Vec<FeatureBound>,
    pub forest: ForestConfig,
    pub trees: usize,
    pub samples_per_tree: usize,
    pub offset: f64,
    pub thresholds: ThresholdConfig,
    pub layout: LayoutInfo,
    pub fitted_at: DateTime<Utc>,
}

// ============================================================================
// DETECTION CONTEXT
// ============================================================================

/// Fitted normalizer + forest + thresholds.
///
/// Built once, then shared read-only (it is `Send + Sync`) by every
/// classification.
#[derive(Debug, Clone)]
pub struct DetectionContext {
    statistics: FeatureStatistics,
    forest: IsolationForest,
    thresholds: ThresholdConfig,
    fitted_at: DateTime<Utc>,
}

impl DetectionContext {
    /// Fit statistics on the raw dataset, then the forest on its
    /// standardized copy
    pub fn fit(
        dataset: &TrainingDataset,
        forest_config: ForestConfig,
        thresholds: ThresholdConfig,
    ) -> Result<Self> {
        forest_config.validate()?;

        let statistics = FeatureStatistics::fit(dataset)?;
        let standardized = statistics.transform_matrix(dataset.features());
        let forest = IsolationForest::fit(&standardized, &forest_config)?;

        Ok(Self {
            statistics,
            forest,
            thresholds,
            fitted_at: Utc::now(),
        })
    }

    /// Load a CSV dataset and fit on it
    pub fn from_csv<P: AsRef<Path>>(
        path: P,
        forest_config: ForestConfig,
        thresholds: ThresholdConfig,
    ) -> Result<Self> {
        let dataset = TrainingDataset::from_csv(path)?;
        Self::fit(&dataset, forest_config, thresholds)
    }

    /// Standardize and score one record
    pub fn score(&self, record: &FlowRecord) -> f64 {
        let standardized = self.statistics.transform(&record.features());
        self.forest.score(&standardized)
    }

    /// Classify one flow
    pub fn classify(&self, record: &FlowRecord) -> Result<ScoredResult> {
        let metrics = FlowMetrics::compute(record)?;

        let anomaly_score = self.score(record);
        let offset = self.forest.offset();

        let violations = self.thresholds.violations(&metrics, anomaly_score);
        let reasons = violations
            .iter()
            .map(|v| self.thresholds.describe(*v, &metrics, anomaly_score))
            .collect::<Vec<_>>();
        let is_anomaly = !violations.is_empty();

        log::debug!(
            "Classified {} flow {}->{}: score={:.4} anomaly={} violations={:?}",
            record.protocol,
            record.source_port,
            record.destination_port,
            anomaly_score,
            is_anomaly,
            violations
        );

        Ok(ScoredResult {
            anomaly_score,
            is_anomaly,
            total_bytes: metrics.total_bytes,
            bytes_per_packet: metrics.bytes_per_packet,
            bytes_per_second: metrics.bytes_per_second,
            packets_per_second: metrics.packets_per_second,
            offset,
            model_outlier: anomaly_score < offset,
            violations,
            reasons,
        })
    }

    pub fn statistics(&self) -> &FeatureStatistics {
        &self.statistics
    }

    pub fn forest(&self) -> &IsolationForest {
        &self.forest
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            dataset_rows: self.statistics.sample_count,
            bounds: self.statistics.bounds(),
            forest: self.forest.config().clone(),
            trees: self.forest.n_trees(),
            samples_per_tree: self.forest.sample_size(),
            offset: self.forest.offset(),
            thresholds: self.thresholds.clone(),
            layout: LayoutInfo::current(),
            fitted_at: self.fitted_at,
        }
    }
}
