//! Scoring configuration. Defaults reproduce the reference dashboard's policy constants.

use crate::error::{Result, RiskError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Outlier model parameters
    pub model: ModelConfig,
    /// Raw score rescaling
    pub normalizer: NormalizerConfig,
    /// Tier banding
    pub classifier: ClassifierConfig,
    /// Logging
    pub log: LogConfig,
}

/// Which rows the outlier model is fitted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPolicy {
    /// Fit on the whole cohort, target included.
    #[default]
    PeerInclusive,
    /// Fit on the cohort without the target; normalized scores are clamped to [0, 1].
    LeaveOneOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Number of isolation trees
    pub n_estimators: usize,
    /// Expected fraction of outliers in the training cohort, (0, 0.5]
    pub contamination: f64,
    /// Seed for tree construction
    pub seed: u64,
    /// Per-tree subsample size, capped at the cohort size
    pub max_samples: usize,
    pub training: TrainingPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Decimal places kept in the normalized score
    pub decimals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Lower edge of the medium band as a fraction of the threshold
    pub medium_band_ratio: f64,
    /// Threshold used when a query does not carry one
    pub default_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            contamination: 0.15,
            seed: 42,
            max_samples: 256,
            training: TrainingPolicy::PeerInclusive,
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { decimals: 3 }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            medium_band_ratio: 0.7,
            default_threshold: 0.5,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl ScoringConfig {
    /// Defaults when `path` does not exist; otherwise the file must parse and validate.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::try_load(path)
    }

    /// Load and validate a JSON config file.
    pub fn try_load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: ScoringConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let m = &self.model;
        if m.n_estimators == 0 {
            return Err(RiskError::InvalidConfig("n_estimators must be positive".into()));
        }
        if !(m.contamination > 0.0 && m.contamination <= 0.5) {
            return Err(RiskError::InvalidConfig(format!(
                "contamination {} must lie in (0, 0.5]",
                m.contamination
            )));
        }
        if m.max_samples < 2 {
            return Err(RiskError::InvalidConfig("max_samples must be at least 2".into()));
        }
        let c = &self.classifier;
        if !(0.0..=1.0).contains(&c.medium_band_ratio) {
            return Err(RiskError::InvalidConfig(format!(
                "medium_band_ratio {} must lie in [0, 1]",
                c.medium_band_ratio
            )));
        }
        if !(0.0..=1.0).contains(&c.default_threshold) {
            return Err(RiskError::InvalidConfig(format!(
                "default_threshold {} must lie in [0, 1]",
                c.default_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_policy() {
        let c = ScoringConfig::default();
        assert_eq!(c.model.n_estimators, 200);
        assert_eq!(c.model.contamination, 0.15);
        assert_eq!(c.model.training, TrainingPolicy::PeerInclusive);
        assert_eq!(c.classifier.medium_band_ratio, 0.7);
        assert_eq!(c.normalizer.decimals, 3);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"model": {{"seed": 7, "training": "leave_one_out"}}}}"#).unwrap();
        let c = ScoringConfig::try_load(f.path()).unwrap();
        assert_eq!(c.model.seed, 7);
        assert_eq!(c.model.n_estimators, 200);
        assert_eq!(c.model.training, TrainingPolicy::LeaveOneOut);
    }

    #[test]
    fn rejects_out_of_range_contamination() {
        let mut c = ScoringConfig::default();
        c.model.contamination = 0.7;
        assert!(matches!(c.validate(), Err(RiskError::InvalidConfig(_))));
    }
}
