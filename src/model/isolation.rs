//! Seeded isolation forest. Input: [rows, features] f64. Output: per-row decision value.
//!
//! Each tree isolates a subsample by random axis-aligned splits; points that need
//! fewer splits to isolate sit further from the bulk of the cohort.

use super::AnomalyModel;
use crate::config::ModelConfig;
use crate::error::{Result, RiskError};
use crate::features::FEATURE_NAMES;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Average path length of an unsuccessful BST search over `n` points.
/// Used to credit leaves that still hold more than one sample.
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

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        depth: usize,
        size: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn grow(x: &Array2<f64>, rows: &mut [usize], max_depth: usize, rng: &mut StdRng) -> Self {
        let mut nodes = Vec::new();
        Self::grow_node(x, rows, 0, max_depth, rng, &mut nodes);
        Self { nodes }
    }

    fn grow_node(
        x: &Array2<f64>,
        rows: &mut [usize],
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
        nodes: &mut Vec<Node>,
    ) -> usize {
        let id = nodes.len();
        nodes.push(Node::Leaf {
            depth,
            size: rows.len(),
        });
        if depth >= max_depth || rows.len() <= 1 {
            return id;
        }

        // Only features that still vary inside this node can split it.
        let candidates: Vec<(usize, f64, f64)> = (0..x.ncols())
            .filter_map(|f| {
                let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                    let v = x[[r, f]];
                    (lo.min(v), hi.max(v))
                });
                (hi > lo).then_some((f, lo, hi))
            })
            .collect();
        if candidates.is_empty() {
            return id;
        }

        let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(lo..hi);

        // lo <= threshold < hi, so both sides are non-empty.
        let mut split = 0;
        for i in 0..rows.len() {
            if x[[rows[i], feature]] <= threshold {
                rows.swap(i, split);
                split += 1;
            }
        }
        let (left_rows, right_rows) = rows.split_at_mut(split);
        let left = Self::grow_node(x, left_rows, depth + 1, max_depth, rng, nodes);
        let right = Self::grow_node(x, right_rows, depth + 1, max_depth, rng, nodes);
        nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    /// Depth of the leaf reached by `row`, plus the expected remaining depth of that leaf.
    pub fn path_length(&self, row: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] <= threshold { left } else { right };
                }
                Node::Leaf { depth, size } => {
                    return depth as f64 + average_path_length(size);
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Fitted forest. Owned by one scoring call; never shared across cohorts.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    n_features: usize,
    sample_size: usize,
    offset: f64,
}

impl IsolationForest {
    /// Fit on every row of `x`. Needs at least two finite rows.
    pub fn fit(x: &Array2<f64>, config: &ModelConfig) -> Result<Self> {
        let n = x.nrows();
        if n < 2 {
            return Err(RiskError::InsufficientData { min: 2, actual: n });
        }
        check_finite(x)?;
        if config.n_estimators == 0 {
            return Err(RiskError::InvalidConfig("n_estimators must be positive".into()));
        }
        if !(config.contamination > 0.0 && config.contamination <= 0.5) {
            return Err(RiskError::InvalidConfig(format!(
                "contamination {} must lie in (0, 0.5]",
                config.contamination
            )));
        }

        let sample_size = config.max_samples.clamp(2, n);
        let max_depth = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.n_estimators)
            .map(|_| {
                let mut rows = rand::seq::index::sample(&mut rng, n, sample_size).into_vec();
                IsolationTree::grow(x, &mut rows, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            n_features: x.ncols(),
            sample_size,
            offset: 0.0,
        };
        let training = forest.score_samples(x)?;
        forest.offset = percentile(&training.to_vec(), 100.0 * config.contamination);

        tracing::debug!(
            rows = n,
            trees = forest.trees.len(),
            sample_size,
            max_depth,
            offset = forest.offset,
            "isolation forest fitted"
        );
        Ok(forest)
    }

    /// Opposite of the anomaly score from the isolation paper: in [-1, 0), lower = more isolated.
    pub fn score_samples(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.n_features {
            return Err(RiskError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        check_finite(x)?;
        let norm = average_path_length(self.sample_size);
        let n_trees = self.trees.len() as f64;
        Ok(x.rows()
            .into_iter()
            .map(|row| {
                let mean_depth = self.trees.iter().map(|t| t.path_length(row)).sum::<f64>() / n_trees;
                -(2f64).powf(-mean_depth / norm)
            })
            .collect())
    }

    /// Decision cut-off derived from the contamination fraction.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

impl AnomalyModel for IsolationForest {
    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self.score_samples(x)? - self.offset)
    }
}

fn check_finite(x: &Array2<f64>) -> Result<()> {
    for ((row, col), &value) in x.indexed_iter() {
        if !value.is_finite() {
            return Err(RiskError::InvalidFeature {
                entity: format!("row {row}"),
                feature: FEATURE_NAMES.get(col).copied().unwrap_or("unknown"),
                value,
            });
        }
    }
    Ok(())
}

/// Linear-interpolated percentile, `q` in [0, 100].
fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn config() -> ModelConfig {
        ModelConfig::default()
    }

    fn cohort() -> Array2<f64> {
        array![
            [0.30, 0.20, 0.10, 0.40],
            [0.10, 0.11, 0.05, 0.10],
            [0.11, 0.10, 0.06, 0.09],
            [0.09, 0.10, 0.05, 0.11],
            [0.10, 0.09, 0.04, 0.10],
        ]
    }

    #[test]
    fn average_path_length_small_n() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        let c3 = 2.0 * (2f64.ln() + EULER_GAMMA) - 2.0 * 2.0 / 3.0;
        assert!((average_path_length(3) - c3).abs() < 1e-12);
    }

    #[test]
    fn percentile_interpolates() {
        let v = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 100.0), 4.0);
        assert!((percentile(&v, 50.0) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn fit_rejects_single_row() {
        let x = array![[0.1, 0.2, 0.3, 0.4]];
        let err = IsolationForest::fit(&x, &config()).unwrap_err();
        assert!(matches!(err, RiskError::InsufficientData { min: 2, actual: 1 }));
    }

    #[test]
    fn fit_rejects_nan() {
        let mut x = cohort();
        x[[2, 1]] = f64::NAN;
        let err = IsolationForest::fit(&x, &config()).unwrap_err();
        match err {
            RiskError::InvalidFeature { feature, .. } => assert_eq!(feature, "RPT_Purchase_Ratio"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn clear_outlier_scores_highest() {
        let x = cohort();
        let forest = IsolationForest::fit(&x, &config()).unwrap();
        let scores = forest.anomaly_scores(&x).unwrap();
        let max_row = scores
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(max_row, 0);
    }

    #[test]
    fn same_seed_same_scores() {
        let x = cohort();
        let a = IsolationForest::fit(&x, &config()).unwrap().anomaly_scores(&x).unwrap();
        let b = IsolationForest::fit(&x, &config()).unwrap().anomaly_scores(&x).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn identical_rows_get_identical_scores() {
        let x = array![[0.2, 0.2, 0.2, 0.2], [0.2, 0.2, 0.2, 0.2], [0.2, 0.2, 0.2, 0.2]];
        let forest = IsolationForest::fit(&x, &config()).unwrap();
        assert!(forest.trees.iter().all(|t| t.node_count() == 1));
        let s = forest.anomaly_scores(&x).unwrap();
        assert_eq!(s[0], s[1]);
        assert_eq!(s[1], s[2]);
    }

    #[test]
    fn decision_function_is_shifted_by_offset() {
        let x = cohort();
        let forest = IsolationForest::fit(&x, &config()).unwrap();
        let raw = forest.score_samples(&x).unwrap();
        let decision = forest.decision_function(&x).unwrap();
        for (r, d) in raw.iter().zip(decision.iter()) {
            assert!((r - forest.offset() - d).abs() < 1e-15);
        }
        assert!(raw.iter().all(|s| (-1.0..0.0).contains(s)));
    }

    #[test]
    fn scoring_checks_dimensions() {
        let forest = IsolationForest::fit(&cohort(), &config()).unwrap();
        let err = forest.anomaly_scores(&array![[0.1, 0.2]]).unwrap_err();
        assert!(matches!(err, RiskError::DimensionMismatch { expected: 4, actual: 2 }));
    }
}
