//! Unsupervised outlier models scored on peer feature matrices.

mod isolation;

pub use isolation::{average_path_length, IsolationForest, IsolationTree};

use crate::error::Result;
use ndarray::{Array1, Array2};

/// A fitted detector. Native convention: higher decision value = more normal.
pub trait AnomalyModel {
    /// Per-row decision value; negative values fall inside the assumed outlier fraction.
    fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Per-row raw anomaly score, higher = more anomalous.
    fn anomaly_scores(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(-self.decision_function(x)?)
    }
}
