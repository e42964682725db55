//! RPT risk CLI: scores one company-year against its industry peers and prints a JSON report.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rpt_risk::{
    config::ScoringConfig,
    dataset::{Dataset, RiskQuery},
    logging::StructuredLogger,
    report::RiskReport,
    risk::RiskEngine,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rpt-risk")]
#[command(about = "Peer-relative related-party transaction risk scoring")]
struct Cli {
    /// Scoring config (JSON); defaults apply when the file is missing
    #[arg(long, env = "RPT_RISK_CONFIG_PATH", default_value = "config.json")]
    config: PathBuf,

    /// Dataset of financial records (JSON array)
    #[arg(long, env = "RPT_RISK_DATASET")]
    dataset: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one company-year against its industry peers
    Assess {
        #[arg(long)]
        industry: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        year: i32,
        /// Sensitivity threshold in [0, 1]; config default when omitted
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// List selectable industries, companies, and years
    Options {
        /// Restrict the company list to one industry
        #[arg(long)]
        industry: Option<String>,
    },
}

#[derive(Serialize)]
struct FilterOptions {
    industries: Vec<String>,
    companies: Vec<String>,
    years: Vec<i32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ScoringConfig::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;

    StructuredLogger::init(config.log.json, &config.log.level);

    let dataset = Dataset::load(&cli.dataset)
        .with_context(|| format!("loading dataset {}", cli.dataset.display()))?;
    info!(rows = dataset.len(), "dataset ready");

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::Assess {
            industry,
            company,
            year,
            threshold,
        } => {
            let threshold = threshold.unwrap_or(config.classifier.default_threshold);
            let query = RiskQuery {
                industry,
                company,
                year,
                threshold,
            };
            let engine = RiskEngine::new(config);
            let report = match RiskReport::build(&engine, &dataset, &query) {
                Ok(r) => r,
                Err(e) => {
                    warn!(company = %query.company, year = query.year, error = %e, "assessment failed");
                    return Err(e).context("risk assessment failed");
                }
            };
            StructuredLogger::emit_json(&report, &mut stdout)?;
        }
        Commands::Options { industry } => {
            let industries = dataset.industries();
            let industry = industry.or_else(|| industries.first().cloned());
            let companies = industry.map(|i| dataset.companies(&i)).unwrap_or_default();
            let options = FilterOptions {
                industries,
                companies,
                years: dataset.years(),
            };
            StructuredLogger::emit_json(&options, &mut stdout)?;
        }
    }

    Ok(())
}
