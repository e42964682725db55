//! Explicit query replacing ambient filter selections.

use crate::error::Result;
use crate::risk::validate_threshold;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskQuery {
    pub industry: String,
    pub company: String,
    pub year: i32,
    /// Sensitivity threshold in [0, 1]
    pub threshold: f64,
}

impl RiskQuery {
    pub fn new(industry: &str, company: &str, year: i32, threshold: f64) -> Self {
        Self {
            industry: industry.to_string(),
            company: company.to_string(),
            year,
            threshold,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold)
    }
}
