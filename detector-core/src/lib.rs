//! FlowGuard Core - Network Flow Anomaly Detection
//!
//! Fits a feature normalizer and an isolation forest once over a training
//! dataset, then scores single flow records against the fitted model plus a
//! set of rate rules.
//!
//! ## Layout
//! - `logic::dataset` - CSV training data loading
//! - `logic::features` - Feature layout, flow records, standardization
//! - `logic::model` - Isolation forest, rule thresholds, classifier
//! - `logic::report` - Display formatting of a classification

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{DetectorError, Result};
pub use logic::dataset::TrainingDataset;
pub use logic::features::{
    FeatureStatistics, FeatureVector, FlowMetrics, FlowRecord, Protocol, FEATURE_COUNT,
};
pub use logic::model::{
    DetectionContext, ForestConfig, IsolationForest, MaxSamples, ModelSummary, ScoredResult,
    ThresholdConfig,
};
pub use logic::report::FlowReport;
