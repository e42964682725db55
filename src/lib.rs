//! RPT Risk — peer-relative related-party transaction anomaly scoring.
//!
//! Modular structure:
//! - [`features`] — Fixed-schema RPT ratio vectors and peer cohorts
//! - [`dataset`] — Financial records, filter options, query-driven cohort selection
//! - [`model`] — Seeded isolation forest outlier model
//! - [`risk`] — Score normalization, tier classification, `compute_risk`
//! - [`benchmark`] — Arm's-length pricing benchmark against peer medians
//! - [`report`] — Per-query report assembly
//! - [`logging`] — Structured JSON logging

pub mod benchmark;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod report;
pub mod risk;

pub use config::ScoringConfig;
pub use dataset::{Dataset, FinancialRecord, RiskQuery};
pub use error::{Result, RiskError};
pub use features::{EntityId, FeatureExtractor, FeatureVector, PeerCohort};
pub use logging::StructuredLogger;
pub use model::{AnomalyModel, IsolationForest};
pub use report::RiskReport;
pub use risk::{RiskAssessment, RiskEngine, RiskTier};
