//! Peer-relative risk: raw model score → normalized score → tier.

mod classifier;
mod engine;
mod normalizer;

pub use classifier::{validate_threshold, RiskClassifier, RiskTier};
pub use engine::{RiskAssessment, RiskEngine};
pub use normalizer::ScoreNormalizer;
