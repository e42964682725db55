//! Rescales a raw anomaly score against the cohort's own score range.

use crate::config::NormalizerConfig;
use crate::error::{Result, RiskError};

#[derive(Debug, Clone)]
pub struct ScoreNormalizer {
    decimals: u32,
}

impl ScoreNormalizer {
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            decimals: config.decimals,
        }
    }

    /// `(target - min) / (max - min)` over `peer_raw_scores`, rounded half away from zero.
    ///
    /// Fails with [`RiskError::DegenerateCohort`] when every peer shares one score;
    /// the result is not clamped.
    pub fn normalize(&self, target_raw: f64, peer_raw_scores: &[f64]) -> Result<f64> {
        if peer_raw_scores.len() < 2 {
            return Err(RiskError::InsufficientData {
                min: 2,
                actual: peer_raw_scores.len(),
            });
        }
        let (min, max) = peer_raw_scores
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
        let range = max - min;
        if !(range > 0.0) || !range.is_finite() {
            return Err(RiskError::DegenerateCohort { value: min });
        }
        Ok(self.round((target_raw - min) / range))
    }

    // Ties go away from zero. Python's round() rounds the exact binary value half-to-even,
    // so the two can differ by one unit in the last kept decimal on exact ties.
    fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimals as i32);
        (value * scale).round() / scale
    }
}

impl Default for ScoreNormalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}
