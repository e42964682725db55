//! Feature extraction: financial record → fixed-schema ratio vector → cohort.

use super::{EntityId, FeatureVector, PeerCohort};
use crate::dataset::FinancialRecord;
use crate::error::Result;

/// Projects financial records onto the RPT ratio schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, record: &FinancialRecord) -> FeatureVector {
        FeatureVector {
            rpt_sales_ratio: record.rpt_sales_ratio,
            rpt_purchase_ratio: record.rpt_purchase_ratio,
            rpt_loan_ratio: record.rpt_loan_ratio,
            rpt_expense_to_ebitda: record.rpt_expense_to_ebitda,
        }
    }

    /// Keyed by company name, in record order.
    pub fn cohort<'a>(&self, records: impl IntoIterator<Item = &'a FinancialRecord>) -> Result<PeerCohort> {
        PeerCohort::new(
            records
                .into_iter()
                .map(|r| (EntityId::from(r.company.as_str()), self.extract(r)))
                .collect(),
        )
    }
}
