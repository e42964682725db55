//! Typed failures of the scoring pipeline. All are deterministic and input-dependent.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("insufficient peer data: need at least {min} rows, have {actual}")]
    InsufficientData { min: usize, actual: usize },

    #[error("invalid feature {feature} for {entity}: {value} is not finite")]
    InvalidFeature {
        entity: String,
        feature: &'static str,
        value: f64,
    },

    #[error("feature dimension mismatch: model expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("degenerate cohort: every peer scored {value}, normalization is undefined")]
    DegenerateCohort { value: f64 },

    #[error("target {entity} is not a member of the peer cohort")]
    TargetNotInCohort { entity: String },

    #[error("entity {entity} appears more than once in the cohort")]
    DuplicateEntity { entity: String },

    #[error("threshold {value} is outside [0, 1]")]
    InvalidThreshold { value: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no record for {company} in {industry} {year}")]
    EntityNotFound {
        industry: String,
        company: String,
        year: i32,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, RiskError>;
