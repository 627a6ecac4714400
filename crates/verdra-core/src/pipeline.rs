//! Validation pipeline: sequences validators and adapters, isolates failures,
//! accumulates results.
//!
//! Phase 1 runs every registered rule validator in registration order; a
//! failing validator becomes a zero-score critical result and the run
//! continues. Phase 2 runs registry adapters and maps their three-way outcome
//! onto result rows. Output ordering is stable: phase 1 before phase 2, each
//! in registration order.

use crate::finding::{Finding, Severity, ValidationResult};
use crate::record::DisclosureRecord;
use crate::registry::{adapter_result_name, CrossCheckOutcome, RegistryAdapter};
use crate::validators::{default_validators, Validator};

/// Orchestrates validators and adapters over one disclosure record.
pub struct Pipeline {
    validators: Vec<Box<dyn Validator>>,
    adapters: Vec<Box<dyn RegistryAdapter>>,
}

impl Pipeline {
    pub fn new(
        validators: Vec<Box<dyn Validator>>,
        adapters: Vec<Box<dyn RegistryAdapter>>,
    ) -> Self {
        Self {
            validators,
            adapters,
        }
    }

    /// The four built-in rule validators, no adapters.
    pub fn default_pipeline() -> Self {
        Self::new(default_validators(), Vec::new())
    }

    pub fn with_adapter(mut self, adapter: Box<dyn RegistryAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    /// Run the pipeline. Never aborts on component failure; degradation is
    /// recorded in the returned results instead.
    pub fn run(&self, record: &DisclosureRecord, cross_validate: bool) -> Vec<ValidationResult> {
        let mut results = Vec::with_capacity(self.validators.len() + self.adapters.len());

        // Phase 1: internal validators
        for validator in &self.validators {
            match validator.validate(record) {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!(validator = validator.name(), error = %e, "validator failed");
                    results.push(
                        ValidationResult::scored(validator.name(), 0.0).with_finding(
                            Finding::new(
                                validator.name(),
                                "VALIDATOR-ERROR",
                                Severity::Critical,
                                format!("Validator {} failed: {}", validator.name(), e),
                            ),
                        ),
                    );
                }
            }
        }

        // Phase 2: external cross-validation
        if cross_validate && !self.adapters.is_empty() {
            for adapter in &self.adapters {
                let outcome = adapter.cross_check(record);
                results.push(outcome_to_result(adapter.name(), outcome));
            }
        }

        results
    }
}

/// Map a cross-check outcome onto a result row.
///
/// The no-data case is explicitly non-penalizing: a null score with a single
/// info finding, so the scorer excludes it from aggregation entirely.
pub fn outcome_to_result(adapter_name: &str, outcome: CrossCheckOutcome) -> ValidationResult {
    let result_name = adapter_result_name(adapter_name);
    match outcome {
        CrossCheckOutcome::Evaluated(result) => result,
        CrossCheckOutcome::DataUnavailable { reason } => {
            tracing::info!(adapter = adapter_name, reason = %reason, "no reference data, skipped");
            ValidationResult::unscored(&result_name).with_finding(Finding::new(
                adapter_name,
                "ADAPTER-NO-DATA",
                Severity::Info,
                format!("External data not available from {}, skipped: {}", adapter_name, reason),
            ))
        }
        CrossCheckOutcome::Failed { reason } => {
            tracing::warn!(adapter = adapter_name, reason = %reason, "adapter failed");
            ValidationResult::unscored(&result_name).with_finding(Finding::new(
                adapter_name,
                "ADAPTER-ERROR",
                Severity::Warning,
                format!("Adapter {} failed: {}", adapter_name, reason),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SbtiAdapter;
    use crate::validators::ValidatorError;

    struct FailingValidator;

    impl Validator for FailingValidator {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn validate(&self, _record: &DisclosureRecord) -> Result<ValidationResult, ValidatorError> {
            Err(ValidatorError::Internal {
                validator: "failing".to_string(),
                message: "boom".to_string(),
            })
        }
    }

    struct FailingAdapter;

    impl RegistryAdapter for FailingAdapter {
        fn name(&self) -> &str {
            "broken"
        }

        fn data_source_url(&self) -> &str {
            ""
        }

        fn cross_check(&self, _record: &DisclosureRecord) -> CrossCheckOutcome {
            CrossCheckOutcome::Failed {
                reason: "malformed dataset".to_string(),
            }
        }
    }

    #[test]
    fn default_pipeline_produces_one_result_per_validator() {
        let pipeline = Pipeline::default_pipeline();
        let record = DisclosureRecord::new("Acme", 2023);
        let results = pipeline.run(&record, false);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].validator_name, "consistency");
        assert_eq!(results[3].validator_name, "risk_coverage");
    }

    #[test]
    fn failing_validator_does_not_abort_the_run() {
        let pipeline = Pipeline::new(
            vec![Box::new(FailingValidator), Box::new(crate::validators::ConsistencyValidator::new())],
            Vec::new(),
        );
        let record = DisclosureRecord::new("Acme", 2023);
        let results = pipeline.run(&record, false);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, Some(0.0));
        assert_eq!(results[0].findings.len(), 1);
        assert_eq!(results[0].findings[0].code, "VALIDATOR-ERROR");
        assert_eq!(results[0].findings[0].severity, Severity::Critical);
        // The next validator still ran.
        assert_eq!(results[1].validator_name, "consistency");
    }

    #[test]
    fn no_data_adapter_yields_null_score_info_result() {
        let pipeline =
            Pipeline::default_pipeline().with_adapter(Box::new(SbtiAdapter::new(None)));
        let record = DisclosureRecord::new("Acme", 2023);
        let results = pipeline.run(&record, true);

        let adapter_result = results.last().unwrap();
        assert_eq!(adapter_result.validator_name, "adapter:sbti");
        assert_eq!(adapter_result.score, None);
        assert_eq!(adapter_result.findings.len(), 1);
        assert_eq!(adapter_result.findings[0].code, "ADAPTER-NO-DATA");
        assert_eq!(adapter_result.findings[0].severity, Severity::Info);
    }

    #[test]
    fn failing_adapter_yields_null_score_warning_result() {
        let pipeline = Pipeline::default_pipeline().with_adapter(Box::new(FailingAdapter));
        let record = DisclosureRecord::new("Acme", 2023);
        let results = pipeline.run(&record, true);

        let adapter_result = results.last().unwrap();
        assert_eq!(adapter_result.score, None);
        assert_eq!(adapter_result.findings[0].code, "ADAPTER-ERROR");
        assert_eq!(adapter_result.findings[0].severity, Severity::Warning);
    }

    #[test]
    fn cross_validate_flag_skips_adapters() {
        let pipeline =
            Pipeline::default_pipeline().with_adapter(Box::new(SbtiAdapter::new(None)));
        let record = DisclosureRecord::new("Acme", 2023);
        let results = pipeline.run(&record, false);
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| !r.is_adapter()));
    }

    #[test]
    fn phase_order_is_stable() {
        let pipeline = Pipeline::default_pipeline()
            .with_adapter(Box::new(FailingAdapter))
            .with_adapter(Box::new(SbtiAdapter::new(None)));
        let record = DisclosureRecord::new("Acme", 2023);
        let results = pipeline.run(&record, true);

        let names: Vec<&str> = results.iter().map(|r| r.validator_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "consistency",
                "quantification",
                "completeness",
                "risk_coverage",
                "adapter:broken",
                "adapter:sbti"
            ]
        );
    }
}
