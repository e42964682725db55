//! Fits a fresh outlier model per cohort, scores the target against its peers, and tiers it.

use super::{validate_threshold, RiskClassifier, RiskTier, ScoreNormalizer};
use crate::config::{ScoringConfig, TrainingPolicy};
use crate::error::{Result, RiskError};
use crate::features::{EntityId, PeerCohort};
use crate::model::{AnomalyModel, IsolationForest};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Risk result for one entity against its cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub entity: EntityId,
    /// Higher = more anomalous
    pub raw_score: f64,
    pub normalized_score: f64,
    pub tier: RiskTier,
    pub threshold: f64,
    /// Raw score of every cohort member, target included
    pub peer_raw_scores: BTreeMap<EntityId, f64>,
}

pub struct RiskEngine {
    config: ScoringConfig,
    normalizer: ScoreNormalizer,
    classifier: RiskClassifier,
}

impl RiskEngine {
    pub fn new(config: ScoringConfig) -> Self {
        let normalizer = ScoreNormalizer::new(&config.normalizer);
        let classifier = RiskClassifier::new(&config.classifier);
        Self {
            config,
            normalizer,
            classifier,
        }
    }

    /// Score `target` against `peers`, which must contain it.
    pub fn compute_risk(&self, target: &EntityId, peers: &PeerCohort, threshold: f64) -> Result<RiskAssessment> {
        validate_threshold(threshold)?;
        if peers.len() < 2 {
            return Err(RiskError::InsufficientData {
                min: 2,
                actual: peers.len(),
            });
        }
        peers.validate()?;
        if !peers.contains(target) {
            return Err(RiskError::TargetNotInCohort {
                entity: target.to_string(),
            });
        }

        let policy = self.config.model.training;
        let model = match policy {
            TrainingPolicy::PeerInclusive => IsolationForest::fit(&peers.to_matrix(), &self.config.model)?,
            TrainingPolicy::LeaveOneOut => {
                let others = peers.without(target);
                IsolationForest::fit(&others.to_matrix(), &self.config.model)?
            }
        };

        let scores = model.anomaly_scores(&peers.to_matrix())?;
        let peer_raw_scores: BTreeMap<EntityId, f64> =
            peers.ids().cloned().zip(scores.iter().copied()).collect();
        let raw_score = peer_raw_scores
            .get(target)
            .copied()
            .ok_or_else(|| RiskError::TargetNotInCohort {
                entity: target.to_string(),
            })?;

        let normalized_score = match policy {
            TrainingPolicy::PeerInclusive => {
                let all: Vec<f64> = peer_raw_scores.values().copied().collect();
                self.normalizer.normalize(raw_score, &all)?
            }
            TrainingPolicy::LeaveOneOut => {
                let others: Vec<f64> = peer_raw_scores
                    .iter()
                    .filter(|(id, _)| *id != target)
                    .map(|(_, s)| *s)
                    .collect();
                self.normalizer.normalize(raw_score, &others)?.clamp(0.0, 1.0)
            }
        };
        let tier = self.classifier.classify(normalized_score, threshold);

        tracing::info!(
            entity = %target,
            cohort = peers.len(),
            raw_score,
            normalized_score,
            tier = %tier,
            threshold,
            "risk computed"
        );

        Ok(RiskAssessment {
            entity: target.clone(),
            raw_score,
            normalized_score,
            tier,
            threshold,
            peer_raw_scores,
        })
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
