//! Full per-query report: snapshot, risk assessment, pricing benchmark, interpretation.

use crate::benchmark::PricingBenchmark;
use crate::dataset::{CompanySnapshot, Dataset, RiskQuery};
use crate::error::Result;
use crate::risk::{RiskAssessment, RiskEngine, RiskTier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interpretation {
    pub related_party: String,
    pub pricing: String,
}

impl Interpretation {
    pub fn new(tier: RiskTier) -> Self {
        let related_party = match tier {
            RiskTier::High => "High related-party purchases vs peers",
            RiskTier::Medium => "Elevated loans/advances to related parties",
            RiskTier::Low => "No major related-party transaction anomalies detected.",
        };
        let pricing = match tier {
            RiskTier::High => {
                "Below-peer margins combined with RPT exposure may indicate non-arm's length pricing."
            }
            RiskTier::Medium | RiskTier::Low => "Pricing margins appear broadly aligned with industry benchmarks.",
        };
        Self {
            related_party: related_party.to_string(),
            pricing: pricing.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub query: RiskQuery,
    pub snapshot: CompanySnapshot,
    pub assessment: RiskAssessment,
    pub benchmark: PricingBenchmark,
    pub interpretation: Interpretation,
}

impl RiskReport {
    /// Select the query's cohort from `dataset`, score the target, and benchmark its pricing.
    pub fn build(engine: &RiskEngine, dataset: &Dataset, query: &RiskQuery) -> Result<Self> {
        query.validate()?;
        let selection = dataset.select(query)?;
        let assessment = engine.compute_risk(&selection.target.entity(), &selection.cohort, query.threshold)?;
        let benchmark = PricingBenchmark::compute(selection.target, &selection.peers);
        let interpretation = Interpretation::new(assessment.tier);
        Ok(Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            query: query.clone(),
            snapshot: CompanySnapshot::from(selection.target),
            assessment,
            benchmark,
            interpretation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_warning_follows_high_tier_only() {
        assert!(Interpretation::new(RiskTier::High).pricing.contains("non-arm's length"));
        for tier in [RiskTier::Medium, RiskTier::Low] {
            assert!(Interpretation::new(tier).pricing.contains("broadly aligned"));
        }
    }

    #[test]
    fn related_party_line_per_tier() {
        assert!(Interpretation::new(RiskTier::High).related_party.contains("purchases vs peers"));
        assert!(Interpretation::new(RiskTier::Medium).related_party.contains("loans/advances"));
        assert!(Interpretation::new(RiskTier::Low).related_party.starts_with("No major"));
    }
}
