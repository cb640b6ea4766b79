//! Isolation Forest
//!
//! Ensemble of random axis-aligned partition trees. A point that is isolated
//! after few splits (short average path) is an outlier.
//!
//! Scores follow the "higher = more normal" convention:
//! `score(x) = -2^(-E[h(x)] / c(psi))`, which lies in (-1, 0).

use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    AUTO_MAX_SAMPLES, DEFAULT_CONTAMINATION, DEFAULT_N_ESTIMATORS, DEFAULT_SEED,
};
use crate::error::{DetectorError, Result};
use crate::logic::features::FeatureVector;

const EULER_GAMMA: f64 = 0.577_215_664_9;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Per-tree sample size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaxSamples {
    /// min(256, rows)
    Auto,
    /// Fixed count, clamped to the number of rows
    Fixed(usize),
}

/// Forest Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees
    pub n_estimators: usize,

    pub max_samples: MaxSamples,

    /// Expected outlier fraction, places the decision offset
    pub contamination: f64,

    /// RNG seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_N_ESTIMATORS,
            max_samples: MaxSamples::Auto,
            contamination: DEFAULT_CONTAMINATION,
            seed: DEFAULT_SEED,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(DetectorError::InvalidConfig(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if let MaxSamples::Fixed(0) = self.max_samples {
            return Err(DetectorError::InvalidConfig(
                "max_samples must be at least 1".to_string(),
            ));
        }
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(DetectorError::InvalidConfig(format!(
                "contamination must be in (0, 0.5], got {}",
                self.contamination
            )));
        }
        Ok(())
    }

    /// Sample size actually drawn per tree for a dataset of `rows` rows
    pub fn sample_size(&self, rows: usize) -> usize {
        match self.max_samples {
            MaxSamples::Auto => rows.min(AUTO_MAX_SAMPLES),
            MaxSamples::Fixed(n) => n.min(rows),
        }
    }
}

// ============================================================================
// TREE
// ============================================================================

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// One isolation tree
#[derive(Debug, Clone)]
pub struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    fn grow(
        data: &Array2<f64>,
        indices: &mut [usize],
        max_depth: usize,
        rng: &mut ChaCha20Rng,
    ) -> Self {
        Self {
            root: grow_node(data, indices, 0, max_depth, rng),
        }
    }

    /// Depth of the leaf reached by `x`, plus the expected depth of the
    /// unbuilt subtree below it
    pub fn path_length(&self, x: ArrayView1<f64>) -> f64 {
        let mut node = &self.root;
        let mut depth = 0.0;

        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split { feature, threshold, left, right } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }

    /// Number of nodes (splits and leaves)
    pub fn node_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => 1 + count(left) + count(right),
            }
        }
        count(&self.root)
    }
}

fn grow_node(
    data: &Array2<f64>,
    indices: &mut [usize],
    depth: usize,
    max_depth: usize,
    rng: &mut ChaCha20Rng,
) -> Node {
    if indices.len() <= 1 || depth >= max_depth {
        return Node::Leaf { size: indices.len() };
    }

    // Only features that still vary within this node can split it
    let mut candidates = Vec::with_capacity(data.ncols());
    for feature in 0..data.ncols() {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &i in indices.iter() {
            let v = data[[i, feature]];
            min = min.min(v);
            max = max.max(v);
        }
        if max > min {
            candidates.push((feature, min, max));
        }
    }

    if candidates.is_empty() {
        return Node::Leaf { size: indices.len() };
    }

    let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(min..max);

    // Partition in place: rows <= threshold first
    let mut split = 0;
    for i in 0..indices.len() {
        if data[[indices[i], feature]] <= threshold {
            indices.swap(i, split);
            split += 1;
        }
    }

    let (left, right) = indices.split_at_mut(split);
    Node::Split {
        feature,
        threshold,
        left: Box::new(grow_node(data, left, depth + 1, max_depth, rng)),
        right: Box::new(grow_node(data, right, depth + 1, max_depth, rng)),
    }
}

/// Average path length of an unsuccessful BST search over `n` points
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

/// Fitted isolation forest
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
    config: ForestConfig,
    offset: f64,
}

impl IsolationForest {
    /// Fit on a (rows x features) matrix, usually already standardized
    pub fn fit(data: &Array2<f64>, config: &ForestConfig) -> Result<Self> {
        config.validate()?;

        let rows = data.nrows();
        if rows == 0 {
            return Err(DetectorError::EmptyDataset);
        }

        let sample_size = config.sample_size(rows);
        let max_depth = (sample_size.max(2) as f64).log2().ceil() as usize;
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);

        let trees = (0..config.n_estimators)
            .map(|_| {
                let mut indices = index::sample(&mut rng, rows, sample_size).into_vec();
                IsolationTree::grow(data, &mut indices, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            config: config.clone(),
            offset: 0.0,
        };

        let training_scores = forest.score_samples(data);
        forest.offset = percentile(training_scores.to_vec(), config.contamination * 100.0);

        log::info!(
            "Isolation forest fitted: {} trees, {} samples/tree, depth limit {}, offset {:.4}",
            forest.trees.len(),
            sample_size,
            max_depth,
            forest.offset
        );

        Ok(forest)
    }

    /// Score one row; higher = more normal
    pub fn score_row(&self, x: ArrayView1<f64>) -> f64 {
        let mean_depth = self.trees.iter().map(|t| t.path_length(x)).sum::<f64>()
            / self.trees.len() as f64;

        let c = average_path_length(self.sample_size);
        let normalized = if c > 0.0 { mean_depth / c } else { 1.0 };

        -(2f64).powf(-normalized)
    }

    /// Score one standardized feature vector
    pub fn score(&self, x: &FeatureVector) -> f64 {
        self.score_row(ArrayView1::from(x.as_slice()))
    }

    /// Score every row of a matrix
    pub fn score_samples(&self, data: &Array2<f64>) -> Array1<f64> {
        data.rows().into_iter().map(|row| self.score_row(row)).collect()
    }

    /// Score relative to the contamination offset; negative = outlier
    pub fn decision_function(&self, x: &FeatureVector) -> f64 {
        self.score(x) - self.offset
    }

    pub fn is_outlier(&self, x: &FeatureVector) -> bool {
        self.decision_function(x) < 0.0
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn trees(&self) -> &[IsolationTree] {
        &self.trees
    }
}

/// Percentile with linear interpolation between closest ranks
fn percentile(mut values: Vec<f64>, q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let pos = (q / 100.0).clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    values[lo] + (values[hi] - values[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    /// Uniform points in the [-1, 1) hypercube
    fn uniform_blob(rows: usize) -> Array2<f64> {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut data = Array2::zeros((rows, 4));
        for r in 0..rows {
            for c in 0..4 {
                data[[r, c]] = rng.gen_range(-1.0..1.0);
            }
        }
        data
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        // c(256) ~ 10.24
        let c = average_path_length(256);
        assert!(c > 10.2 && c < 10.3, "c(256) = {}", c);
    }

    #[test]
    fn test_percentile() {
        let v = vec![4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(percentile(v.clone(), 0.0), 1.0);
        assert_eq!(percentile(v.clone(), 50.0), 3.0);
        assert_eq!(percentile(v.clone(), 100.0), 5.0);
        assert!((percentile(v, 20.0) - 1.8).abs() < 1e-12);
    }

    #[test]
    fn test_config_validation() {
        assert!(ForestConfig::default().validate().is_ok());
        let bad = ForestConfig { n_estimators: 0, ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = ForestConfig { contamination: 0.7, ..Default::default() };
        assert!(bad.validate().is_err());
        let bad = ForestConfig { max_samples: MaxSamples::Fixed(0), ..Default::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_sample_size() {
        let config = ForestConfig::default();
        assert_eq!(config.sample_size(1000), 256);
        assert_eq!(config.sample_size(100), 100);
        let fixed = ForestConfig { max_samples: MaxSamples::Fixed(64), ..Default::default() };
        assert_eq!(fixed.sample_size(1000), 64);
        assert_eq!(fixed.sample_size(10), 10);
    }

    #[test]
    fn test_fit_builds_configured_trees() {
        let data = uniform_blob(500);
        let forest = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();

        assert_eq!(forest.n_trees(), 150);
        assert_eq!(forest.sample_size(), 256);
        // depth limit 8 -> at most 2^9 - 1 nodes
        assert!(forest.trees().iter().all(|t| t.node_count() <= 511));
    }

    #[test]
    fn test_scores_in_range() {
        let data = uniform_blob(300);
        let forest = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();

        for s in forest.score_samples(&data).iter() {
            assert!(*s > -1.0 && *s < 0.0, "score {} out of range", s);
        }
    }

    #[test]
    fn test_outlier_scores_lower() {
        let data = uniform_blob(400);
        let forest = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();

        let inlier = forest.score(&FeatureVector::from([0.0, 0.0, 0.0, 0.0]));
        let outlier = forest.score(&FeatureVector::from([25.0, -30.0, 40.0, 12.0]));

        assert!(outlier < inlier, "outlier {} inlier {}", outlier, inlier);
        assert!(forest.is_outlier(&FeatureVector::from([25.0, -30.0, 40.0, 12.0])));
        assert!(!forest.is_outlier(&FeatureVector::from([0.0, 0.0, 0.0, 0.0])));
    }

    #[test]
    fn test_deterministic_with_seed() {
        let data = uniform_blob(200);
        let a = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();
        let b = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();

        let x = FeatureVector::from([0.3, -0.2, 0.9, -1.5]);
        assert_eq!(a.score(&x).to_bits(), b.score(&x).to_bits());
        assert_eq!(a.offset().to_bits(), b.offset().to_bits());
    }

    #[test]
    fn test_different_seed_changes_forest() {
        let data = uniform_blob(200);
        let a = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();
        let b = IsolationForest::fit(&data, &ForestConfig { seed: 1, ..Default::default() }).unwrap();

        let x = FeatureVector::from([0.3, -0.2, 0.9, -1.5]);
        assert_ne!(a.score(&x), b.score(&x));
    }

    #[test]
    fn test_offset_flags_contamination_share() {
        let data = uniform_blob(500);
        let forest = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();

        let flagged = forest
            .score_samples(&data)
            .iter()
            .filter(|s| **s < forest.offset())
            .count();
        // 20% of 500, give or take ties at the boundary
        assert!((95..=100).contains(&flagged), "flagged {}", flagged);
    }

    #[test]
    fn test_constant_data_does_not_split() {
        let data = Array2::from_elem((50, 4), 3.0);
        let forest = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();

        assert!(forest.trees().iter().all(|t| t.node_count() == 1));
        let s = forest.score(&FeatureVector::from([3.0, 3.0, 3.0, 3.0]));
        assert!(s.is_finite());
        // every path is c(50), so the normalized depth is exactly 1
        assert!((s + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_row_scores_midpoint() {
        let data = Array2::from_elem((1, 4), 1.0);
        let forest = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();
        assert_eq!(forest.score(&FeatureVector::from([9.0, 9.0, 9.0, 9.0])), -0.5);
    }

    #[test]
    fn test_empty_data_rejected() {
        let data = Array2::<f64>::zeros((0, 4));
        assert!(matches!(
            IsolationForest::fit(&data, &ForestConfig::default()),
            Err(DetectorError::EmptyDataset)
        ));
    }
}
