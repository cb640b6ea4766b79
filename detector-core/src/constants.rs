//! Central Configuration Constants
//!
//! Single source of truth for all model and rule defaults.

/// Default training dataset location (relative to the working directory)
pub const DEFAULT_DATASET_PATH: &str = "data/synthetic_network_traffic.csv";

// ============================================
// Isolation forest defaults
// ============================================

/// Number of trees in the ensemble
pub const DEFAULT_N_ESTIMATORS: usize = 150;

/// Upper bound of the automatic per-tree sample size
pub const AUTO_MAX_SAMPLES: usize = 256;

/// Expected fraction of outliers in the training data
pub const DEFAULT_CONTAMINATION: f64 = 0.2;

/// Seed for reproducible forests
pub const DEFAULT_SEED: u64 = 42;

// ============================================
// Rule thresholds
// ============================================

/// Maximum bytes per packet for normal traffic (roughly one full TCP segment)
pub const DEFAULT_MAX_BYTES_PER_PACKET: f64 = 500.0;

/// Maximum bytes per second for normal traffic
pub const DEFAULT_MAX_BYTES_PER_SECOND: f64 = 500_000.0;

/// Maximum packets per second for normal traffic
pub const DEFAULT_MAX_PACKETS_PER_SECOND: f64 = 5_000.0;

/// Minimum model score for normal traffic
pub const DEFAULT_MIN_ANOMALY_SCORE: f64 = -1.0;

/// Library version
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
