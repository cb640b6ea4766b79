//! Features Module - Feature Layout, Flow Records and Normalizer
//!
//! A `FlowRecord` maps to a `FeatureVector` in `FEATURE_LAYOUT` order, which
//! `FeatureStatistics` standardizes before it reaches the model.

pub mod layout;
pub mod vector;
pub mod flow;
pub mod scaler;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::FeatureVector;
pub use flow::{FlowMetrics, FlowRecord, Protocol};
pub use scaler::{FeatureBound, FeatureStatistics};
