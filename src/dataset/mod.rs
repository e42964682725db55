//! Financial dataset: record loading, filter options, and query-driven cohort assembly.

mod query;

pub use query::RiskQuery;

use crate::error::{Result, RiskError};
use crate::features::{EntityId, FeatureExtractor, PeerCohort};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

/// One company-year row of the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Industry")]
    pub industry: String,
    #[serde(rename = "Year")]
    pub year: i32,
    /// ₹ Cr
    #[serde(rename = "Revenue", default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(rename = "EBITDA", default, skip_serializing_if = "Option::is_none")]
    pub ebitda: Option<f64>,
    #[serde(rename = "Total_Assets", default, skip_serializing_if = "Option::is_none")]
    pub total_assets: Option<f64>,
    #[serde(rename = "EBITDA_Margin", default, skip_serializing_if = "Option::is_none")]
    pub ebitda_margin: Option<f64>,
    #[serde(rename = "RPT_Sales_Ratio")]
    pub rpt_sales_ratio: f64,
    #[serde(rename = "RPT_Purchase_Ratio")]
    pub rpt_purchase_ratio: f64,
    #[serde(rename = "RPT_Loan_Ratio")]
    pub rpt_loan_ratio: f64,
    #[serde(rename = "RPT_Expense_to_EBITDA")]
    pub rpt_expense_to_ebitda: f64,
}

impl FinancialRecord {
    /// Record with only identity and RPT ratios set.
    pub fn with_ratios(company: &str, industry: &str, year: i32, ratios: [f64; 4]) -> Self {
        Self {
            company: company.to_string(),
            industry: industry.to_string(),
            year,
            revenue: None,
            ebitda: None,
            total_assets: None,
            ebitda_margin: None,
            rpt_sales_ratio: ratios[0],
            rpt_purchase_ratio: ratios[1],
            rpt_loan_ratio: ratios[2],
            rpt_expense_to_ebitda: ratios[3],
        }
    }

    pub fn entity(&self) -> EntityId {
        EntityId::from(self.company.as_str())
    }
}

/// Company snapshot shown next to the risk score. Absent columns stay absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub revenue: Option<f64>,
    pub ebitda: Option<f64>,
    pub total_assets: Option<f64>,
}

impl From<&FinancialRecord> for CompanySnapshot {
    fn from(r: &FinancialRecord) -> Self {
        Self {
            revenue: r.revenue,
            ebitda: r.ebitda,
            total_assets: r.total_assets,
        }
    }
}

/// Peer rows and the target row selected by one query.
#[derive(Debug, Clone)]
pub struct CohortSelection<'a> {
    pub target: &'a FinancialRecord,
    pub peers: Vec<&'a FinancialRecord>,
    pub cohort: PeerCohort,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<FinancialRecord>,
}

impl Dataset {
    pub fn new(records: Vec<FinancialRecord>) -> Self {
        Self { records }
    }

    /// Load records from a `.json` array or, for any other extension, a CSV file
    /// with the source column headers.
    pub fn load(path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let dataset = if is_json {
            let data = std::fs::read_to_string(path)?;
            Self::new(serde_json::from_str(&data)?)
        } else {
            Self::from_csv(std::fs::File::open(path)?)?
        };
        tracing::debug!(path = %path.display(), rows = dataset.len(), "dataset loaded");
        Ok(dataset)
    }

    pub fn from_csv<R: Read>(input: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(input);
        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: FinancialRecord = result?;
            records.push(record);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted unique industries.
    pub fn industries(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.industry.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted unique companies within an industry.
    pub fn companies(&self, industry: &str) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.industry == industry)
            .map(|r| r.company.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Unique years, most recent first.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.records.iter().map(|r| r.year).collect();
        years.into_iter().rev().collect()
    }

    pub fn find(&self, industry: &str, company: &str, year: i32) -> Option<&FinancialRecord> {
        self.records
            .iter()
            .find(|r| r.industry == industry && r.company == company && r.year == year)
    }

    /// Every record sharing the query's (industry, year), target included.
    pub fn select(&self, query: &RiskQuery) -> Result<CohortSelection<'_>> {
        let target = self
            .find(&query.industry, &query.company, query.year)
            .ok_or_else(|| RiskError::EntityNotFound {
                industry: query.industry.clone(),
                company: query.company.clone(),
                year: query.year,
            })?;
        let peers: Vec<&FinancialRecord> = self
            .records
            .iter()
            .filter(|r| r.industry == query.industry && r.year == query.year)
            .collect();
        let cohort = FeatureExtractor::new().cohort(peers.iter().copied())?;
        Ok(CohortSelection {
            target,
            peers,
            cohort,
        })
    }

    pub fn cohort(&self, query: &RiskQuery) -> Result<PeerCohort> {
        self.select(query).map(|s| s.cohort)
    }
}
