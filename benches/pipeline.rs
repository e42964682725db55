//! Pipeline benchmark: dataset query → cohort → compute_risk → report.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rpt_risk::dataset::{Dataset, FinancialRecord, RiskQuery};
use rpt_risk::report::RiskReport;
use rpt_risk::risk::RiskEngine;

fn make_dataset(companies: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(11);
    let records = (0..companies)
        .map(|i| {
            let ratios = [
                rng.gen_range(0.0..0.4),
                rng.gen_range(0.0..0.4),
                rng.gen_range(0.0..0.2),
                rng.gen_range(0.0..0.6),
            ];
            let mut r = FinancialRecord::with_ratios(&format!("co_{}", i), "Chemicals", 2024, ratios);
            r.ebitda_margin = Some(rng.gen_range(0.05..0.25));
            r
        })
        .collect();
    Dataset::new(records)
}

fn bench_cohort_selection(c: &mut Criterion) {
    let dataset = make_dataset(200);
    let query = RiskQuery::new("Chemicals", "co_0", 2024, 0.5);

    c.bench_function("cohort_select_200", |b| b.iter(|| dataset.cohort(black_box(&query)).unwrap()));
}

fn bench_full_pipeline(c: &mut Criterion) {
    let engine = RiskEngine::default();
    let dataset = make_dataset(50);
    let query = RiskQuery::new("Chemicals", "co_3", 2024, 0.5);

    c.bench_function("full_pipeline_query_to_report", |b| {
        b.iter(|| RiskReport::build(&engine, &dataset, black_box(&query)).unwrap())
    });
}

criterion_group!(benches, bench_cohort_selection, bench_full_pipeline);
criterion_main!(benches);
