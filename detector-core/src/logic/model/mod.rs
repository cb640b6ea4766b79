//! Model Module - Outlier Scoring and Classification
//!
//! - `forest` - Isolation forest (fit once, score many)
//! - `threshold` - Rate rule thresholds
//! - `classifier` - DetectionContext combining both into a verdict

pub mod forest;
pub mod threshold;
pub mod classifier;

// Re-export common types
pub use forest::{ForestConfig, IsolationForest, IsolationTree, MaxSamples};
pub use threshold::{RuleViolation, ThresholdConfig};
pub use classifier::{DetectionContext, ModelSummary, ScoredResult};
