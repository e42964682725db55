//! Three ordered tiers from a normalized score and a caller threshold.

use crate::config::ClassifierConfig;
use crate::error::{Result, RiskError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(RiskError::InvalidThreshold { value: threshold })
    }
}

/// Bands: `[threshold, ∞)` high, `[threshold * ratio, threshold)` medium, below that low.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    medium_band_ratio: f64,
}

impl RiskClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            medium_band_ratio: config.medium_band_ratio,
        }
    }

    pub fn classify(&self, normalized_score: f64, threshold: f64) -> RiskTier {
        if normalized_score >= threshold {
            RiskTier::High
        } else if normalized_score >= threshold * self.medium_band_ratio {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}
