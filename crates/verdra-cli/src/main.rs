use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use verdra_core::{
    CdpAdapter, DisclosureRecord, Pipeline, ReferenceTable, SbtiAdapter, Scorer, Severity,
};

#[derive(Parser, Debug)]
#[command(name = "verdra", version, about = "Climate disclosure evaluation CLI")]
struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a disclosure record and print the aggregated result
    Analyze {
        /// Disclosure record file (JSON or YAML)
        record: PathBuf,
        /// SBTi registry CSV for cross-validation
        #[arg(long)]
        sbti: Option<PathBuf>,
        /// CDP dataset CSV for cross-validation
        #[arg(long)]
        cdp: Option<PathBuf>,
        /// Skip the external cross-validation phase
        #[arg(long, default_value_t = false)]
        no_cross_validate: bool,
        /// Scoring weight overrides as JSON, e.g. '{"consistency":0.4}'
        #[arg(long)]
        weights: Option<String>,
    },
    /// Parse a disclosure record and report whether it is usable
    Validate {
        /// Disclosure record file (JSON or YAML)
        record: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            record,
            sbti,
            cdp,
            no_cross_validate,
            weights,
        } => analyze(&record, sbti, cdp, !no_cross_validate, weights, cli.json),
        Commands::Validate { record } => validate(&record, cli.json),
    }
}

fn load_record(path: &Path) -> Result<DisclosureRecord> {
    let record = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => DisclosureRecord::from_yaml_file(path),
        _ => DisclosureRecord::from_json_file(path),
    };
    record.with_context(|| format!("failed to load disclosure record from {}", path.display()))
}

fn analyze(
    record_path: &Path,
    sbti: Option<PathBuf>,
    cdp: Option<PathBuf>,
    cross_validate: bool,
    weights: Option<String>,
    json: bool,
) -> Result<()> {
    let record = load_record(record_path)?;

    let mut pipeline = Pipeline::default_pipeline();
    if let Some(path) = sbti {
        let table = ReferenceTable::from_csv_path(&path)
            .with_context(|| format!("failed to load SBTi registry from {}", path.display()))?;
        pipeline = pipeline.with_adapter(Box::new(SbtiAdapter::new(Some(table))));
    }
    if let Some(path) = cdp {
        let table = ReferenceTable::from_csv_path(&path)
            .with_context(|| format!("failed to load CDP dataset from {}", path.display()))?;
        pipeline = pipeline.with_adapter(Box::new(CdpAdapter::new(Some(table))));
    }

    let scorer = match weights {
        Some(raw) => {
            let parsed: BTreeMap<String, f64> =
                serde_json::from_str(&raw).context("weights must be a JSON object of numbers")?;
            if parsed.is_empty() {
                bail!("weights override is empty");
            }
            Scorer::with_weights(parsed)
        }
        None => Scorer::new(),
    };

    tracing::info!(
        company = %record.company_name,
        adapters = pipeline.adapter_count(),
        cross_validate,
        "running evaluation"
    );
    let results = pipeline.run(&record, cross_validate);
    let aggregated = scorer.aggregate(&record, results);

    if json {
        println!("{}", serde_json::to_string_pretty(&aggregated)?);
    } else {
        print_report(&aggregated);
    }
    Ok(())
}

fn validate(record_path: &Path, json: bool) -> Result<()> {
    let record = load_record(record_path)?;
    if json {
        println!(
            "{}",
            serde_json::json!({
                "valid": true,
                "company_name": record.company_name,
                "report_year": record.report_year,
                "emissions": record.emissions.len(),
                "targets": record.targets.len(),
                "risks": record.risks.len(),
            })
        );
    } else {
        println!(
            "OK: {} ({}): {} emission entries, {} targets, {} risks",
            record.company_name,
            record.report_year,
            record.emissions.len(),
            record.targets.len(),
            record.risks.len()
        );
    }
    Ok(())
}

fn print_report(aggregated: &verdra_core::AggregatedResult) {
    println!(
        "{}: {:.1}/100 (Grade {})",
        aggregated.company_name, aggregated.overall_score, aggregated.grade
    );
    println!();

    println!("Dimensions:");
    for (dimension, score) in &aggregated.dimension_scores {
        println!("  {:<16} {:>5.1}%", dimension, score);
    }

    if let Some(cross) = &aggregated.cross_validation {
        println!();
        println!(
            "Cross-validation: {} adapter(s), penalty {:.1}",
            cross.adapters_used.len(),
            cross.penalty_applied
        );
    }

    let mut findings: Vec<_> = aggregated
        .validation_results
        .iter()
        .flat_map(|r| r.findings.iter())
        .collect();
    findings.sort_by(|a, b| b.severity.cmp(&a.severity));

    if !findings.is_empty() {
        println!();
        println!("Findings:");
        for finding in findings {
            let marker = match finding.severity {
                Severity::Critical => "!!",
                Severity::Warning => " !",
                Severity::Info => "  ",
            };
            println!("{} [{}] {}", marker, finding.code, finding.message);
        }
    }

    println!();
    println!("{}", aggregated.summary);
}
