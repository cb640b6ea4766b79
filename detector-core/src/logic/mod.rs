//! Logic Module - Detection Engines
//!
//! - `dataset/` - Training data loading
//! - `features/` - Feature layout, flow records, normalizer
//! - `model/` - Isolation forest, thresholds, classifier
//! - `report` - Result formatting

pub mod dataset;
pub mod features;
pub mod model;
pub mod report;
