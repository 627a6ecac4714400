//! # verdra-core
//!
//! Deterministic climate disclosure validation and scoring engine.
//!
//! This crate evaluates a structured disclosure record along four scored
//! dimensions (consistency, quantification, completeness, risk coverage) and
//! cross-checks claims against externally supplied registry tables.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same record always produces the same results
//! 2. **No network calls**: All evaluation here is rule-based; the news
//!    cross-referencer lives in `verdra-runtime`
//! 3. **Failure-isolating**: A failing validator or adapter degrades into a
//!    finding, never into an aborted run
//! 4. **Non-punitive absence**: Missing reference data is recorded and
//!    skipped, never scored against the company
//!
//! ## Example
//!
//! ```rust,ignore
//! use verdra_core::{DisclosureRecord, Pipeline, Scorer};
//!
//! let record = DisclosureRecord::from_json_file("acme-2023.json")?;
//! let results = Pipeline::default_pipeline().run(&record, true);
//! let aggregated = Scorer::new().aggregate(&record, results);
//!
//! println!("{} grade {}", aggregated.overall_score, aggregated.grade);
//! ```

pub mod finding;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod scorer;
pub mod validators;

// Re-export main types at crate root
pub use finding::{
    AggregatedResult, CrossValidationSummary, Finding, Severity, ValidationResult,
};
pub use pipeline::{outcome_to_result, Pipeline};
pub use record::{
    DisclosureRecord, EmissionEntry, EmissionScope, Governance, RecordError, RiskEntry, RiskKind,
    TargetEntry,
};
pub use registry::{
    CdpAdapter, CrossCheckOutcome, CustomAdapter, MatchCandidate, MatchConfig, NameMatcher,
    ReferenceTable, RegistryAdapter, SbtiAdapter, SectorBenchmark, TableError,
};
pub use scorer::Scorer;
pub use validators::{
    default_validators, CompletenessValidator, ConsistencyValidator, QuantificationValidator,
    RiskCoverageValidator, Validator, ValidatorError,
};

/// Evaluate a record with the default pipeline and scorer.
///
/// This is the zero-configuration entry point: the four rule validators, no
/// external adapters.
pub fn evaluate(record: &DisclosureRecord) -> AggregatedResult {
    let results = Pipeline::default_pipeline().run(record, false);
    Scorer::new().aggregate(record, results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_produces_all_dimensions() {
        let record = DisclosureRecord::new("Acme Industrial", 2023);
        let aggregated = evaluate(&record);

        assert_eq!(aggregated.company_name, "Acme Industrial");
        assert_eq!(aggregated.validation_results.len(), 4);
        assert!(aggregated.dimension_scores.contains_key("consistency"));
        assert!(aggregated.dimension_scores.contains_key("risk_coverage"));
    }

    #[test]
    fn empty_record_grades_poorly_but_still_produces_a_result() {
        let record = DisclosureRecord::new("Shell Co", 2023);
        let aggregated = evaluate(&record);
        assert_eq!(aggregated.grade, "F");
        assert!(aggregated.overall_score < 60.0);
    }
}
