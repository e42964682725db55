//! Arm's-length pricing benchmark: company metrics against the peer-cohort median.

use crate::dataset::FinancialRecord;
use serde::{Deserialize, Serialize};

/// Pricing metrics compared against the industry median.
pub const PRICING_METRICS: [&str; 2] = ["EBITDA_Margin", "RPT_Expense_to_EBITDA"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: String,
    pub company_value: f64,
    pub industry_median: f64,
    /// company_value - industry_median
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingBenchmark {
    pub metrics: Vec<MetricComparison>,
}

impl PricingBenchmark {
    /// Compare `target` with the median of `peers` (target included) per pricing metric.
    /// A metric is skipped when the target lacks it or no peer carries a finite value;
    /// peers missing the column do not enter the median.
    pub fn compute(target: &FinancialRecord, peers: &[&FinancialRecord]) -> Self {
        let metrics = PRICING_METRICS
            .iter()
            .filter_map(|&metric| {
                let company_value = metric_value(target, metric).filter(|v| v.is_finite())?;
                let values: Vec<f64> = peers.iter().filter_map(|r| metric_value(r, metric)).collect();
                let industry_median = median(&values)?;
                Some(MetricComparison {
                    metric: metric.to_string(),
                    company_value,
                    industry_median,
                    deviation: company_value - industry_median,
                })
            })
            .collect();
        Self { metrics }
    }

    pub fn get(&self, metric: &str) -> Option<&MetricComparison> {
        self.metrics.iter().find(|m| m.metric == metric)
    }
}

fn metric_value(r: &FinancialRecord, metric: &str) -> Option<f64> {
    match metric {
        "EBITDA_Margin" => r.ebitda_margin,
        "RPT_Expense_to_EBITDA" => Some(r.rpt_expense_to_ebitda),
        _ => None,
    }
}

/// Median of the finite values; mean of the middle pair for even counts.
fn median(values: &[f64]) -> Option<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;
    Some(if v.len() % 2 == 0 {
        (v[mid - 1] + v[mid]) / 2.0
    } else {
        v[mid]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(company: &str, margin: Option<f64>, expense: f64) -> FinancialRecord {
        let mut r = FinancialRecord::with_ratios(company, "Auto", 2024, [0.1, 0.1, 0.1, expense]);
        r.ebitda_margin = margin;
        r
    }

    #[test]
    fn median_handles_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[f64::NAN]), None);
    }

    #[test]
    fn compares_against_cohort_median() {
        let target = record("T", Some(0.08), 0.5);
        let others = [record("A", Some(0.12), 0.1), record("B", Some(0.15), 0.2)];
        let peers: Vec<&FinancialRecord> = std::iter::once(&target).chain(others.iter()).collect();
        let b = PricingBenchmark::compute(&target, &peers);
        let margin = b.get("EBITDA_Margin").unwrap();
        assert_eq!(margin.industry_median, 0.12);
        assert!((margin.deviation + 0.04).abs() < 1e-12);
        assert_eq!(b.get("RPT_Expense_to_EBITDA").unwrap().industry_median, 0.2);
    }

    #[test]
    fn missing_margins_stay_out_of_the_median() {
        let target = record("T", Some(0.08), 0.5);
        let others = [record("A", None, 0.1), record("B", Some(0.16), 0.2), record("C", None, 0.3)];
        let peers: Vec<&FinancialRecord> = std::iter::once(&target).chain(others.iter()).collect();
        let b = PricingBenchmark::compute(&target, &peers);
        assert_eq!(b.get("EBITDA_Margin").unwrap().industry_median, 0.12);
    }

    #[test]
    fn target_without_margin_skips_the_metric() {
        let target = record("T", None, 0.5);
        let other = record("A", Some(0.12), 0.1);
        let b = PricingBenchmark::compute(&target, &[&target, &other]);
        assert!(b.get("EBITDA_Margin").is_none());
        assert!(b.get("RPT_Expense_to_EBITDA").is_some());
    }
}
