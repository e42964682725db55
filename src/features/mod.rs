//! Fixed-schema RPT ratio features and the peer cohorts built from them.

mod cohort;
mod pipeline;

pub use cohort::PeerCohort;
pub use pipeline::FeatureExtractor;

use crate::error::{Result, RiskError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column order of every feature matrix handed to the outlier model.
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "RPT_Sales_Ratio",
    "RPT_Purchase_Ratio",
    "RPT_Loan_Ratio",
    "RPT_Expense_to_EBITDA",
];

pub const FEATURE_DIM: usize = 4;

/// Identifies one entity (company) inside a cohort.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// RPT ratios of one entity-year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "RPT_Sales_Ratio")]
    pub rpt_sales_ratio: f64,
    #[serde(rename = "RPT_Purchase_Ratio")]
    pub rpt_purchase_ratio: f64,
    #[serde(rename = "RPT_Loan_Ratio")]
    pub rpt_loan_ratio: f64,
    #[serde(rename = "RPT_Expense_to_EBITDA")]
    pub rpt_expense_to_ebitda: f64,
}

impl FeatureVector {
    pub fn new(sales: f64, purchase: f64, loan: f64, expense_to_ebitda: f64) -> Self {
        Self {
            rpt_sales_ratio: sales,
            rpt_purchase_ratio: purchase,
            rpt_loan_ratio: loan,
            rpt_expense_to_ebitda: expense_to_ebitda,
        }
    }

    /// Values in [`FEATURE_NAMES`] order
    pub fn to_array(&self) -> [f64; FEATURE_DIM] {
        [
            self.rpt_sales_ratio,
            self.rpt_purchase_ratio,
            self.rpt_loan_ratio,
            self.rpt_expense_to_ebitda,
        ]
    }

    /// Rejects NaN and infinite ratios. Business meaning is not checked.
    pub fn validate(&self, entity: &EntityId) -> Result<()> {
        for (&name, value) in FEATURE_NAMES.iter().zip(self.to_array()) {
            if !value.is_finite() {
                return Err(RiskError::InvalidFeature {
                    entity: entity.to_string(),
                    feature: name,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_follows_schema_order() {
        let v = FeatureVector::new(0.3, 0.2, 0.1, 0.4);
        assert_eq!(v.to_array(), [0.3, 0.2, 0.1, 0.4]);
    }

    #[test]
    fn nan_loan_ratio_is_rejected() {
        let v = FeatureVector::new(0.3, 0.2, f64::NAN, 0.4);
        let err = v.validate(&"Acme".into()).unwrap_err();
        match err {
            RiskError::InvalidFeature { entity, feature, .. } => {
                assert_eq!(entity, "Acme");
                assert_eq!(feature, "RPT_Loan_Ratio");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn serializes_with_schema_names() {
        let v = FeatureVector::new(0.1, 0.2, 0.3, 0.4);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json["RPT_Expense_to_EBITDA"], 0.4);
    }
}
