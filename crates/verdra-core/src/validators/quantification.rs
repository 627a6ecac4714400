//! Data-density checks.
//!
//! Assesses whether the narrative is backed by quantitative metrics: emission
//! figures, quantified targets, quantified risks. Three checklists with fixed
//! weights; each unmet item emits a warning finding.

use crate::finding::{Finding, Severity, ValidationResult};
use crate::record::{DisclosureRecord, EmissionScope};

use super::{Validator, ValidatorError};

type Check = (&'static str, fn(&DisclosureRecord) -> bool);

const EMISSION_CHECKS: &[Check] = &[
    ("scope1_absolute", |r| {
        r.emissions
            .iter()
            .any(|e| e.scope == EmissionScope::Scope1 && e.value.is_some())
    }),
    ("scope2_absolute", |r| {
        r.emissions
            .iter()
            .any(|e| e.scope == EmissionScope::Scope2 && e.value.is_some())
    }),
    ("scope3_absolute", |r| {
        r.emissions
            .iter()
            .any(|e| e.scope == EmissionScope::Scope3 && e.value.is_some())
    }),
    ("baseline_year", |r| {
        r.emissions.iter().any(|e| e.baseline_year.is_some())
    }),
    ("intensity_metric", |r| {
        r.emissions.iter().any(|e| e.intensity_value.is_some())
    }),
    ("methodology", |r| {
        r.emissions.iter().any(|e| e.methodology.is_some())
    }),
    ("third_party_assurance", |r| {
        r.emissions.iter().any(|e| e.assurance_level.is_some())
    }),
];

const TARGET_CHECKS: &[Check] = &[
    ("reduction_percentage", |r| {
        r.targets.iter().any(|t| t.reduction_pct.is_some())
    }),
    ("target_year", |r| r.targets.iter().any(|t| t.target_year.is_some())),
    ("base_year", |r| r.targets.iter().any(|t| t.base_year.is_some())),
    ("interim_milestones", |r| {
        r.targets.iter().any(|t| !t.interim_targets.is_empty())
    }),
    ("scope_coverage", |r| {
        r.targets.iter().any(|t| !t.scopes_covered.is_empty())
    }),
];

const RISK_CHECKS: &[Check] = &[
    ("financial_impact", |r| {
        r.risks.iter().any(|k| k.financial_impact_value.is_some())
    }),
    ("time_horizon", |r| r.risks.iter().any(|k| k.time_horizon.is_some())),
    ("likelihood", |r| r.risks.iter().any(|k| k.likelihood.is_some())),
    ("mitigation", |r| {
        r.risks.iter().any(|k| k.mitigation_strategy.is_some())
    }),
];

const EMISSIONS_WEIGHT: f64 = 0.40;
const TARGETS_WEIGHT: f64 = 0.35;
const RISKS_WEIGHT: f64 = 0.25;

/// Assesses the quantitative backing of the disclosure.
pub struct QuantificationValidator;

impl QuantificationValidator {
    pub fn new() -> Self {
        Self
    }

    fn run_checklist(
        &self,
        record: &DisclosureRecord,
        checks: &[Check],
        findings: &mut Vec<Finding>,
    ) -> f64 {
        let mut met = 0usize;
        for (key, check) in checks {
            if check(record) {
                met += 1;
            } else {
                findings.push(
                    Finding::new(
                        self.name(),
                        format!("QUANT-{}", key.to_uppercase()),
                        Severity::Warning,
                        format!("Missing quantification: {}", key.replace('_', " ")),
                    )
                    .with_field(*key),
                );
            }
        }
        met as f64 / checks.len() as f64
    }
}

impl Default for QuantificationValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for QuantificationValidator {
    fn name(&self) -> &'static str {
        "quantification"
    }

    fn validate(&self, record: &DisclosureRecord) -> Result<ValidationResult, ValidatorError> {
        let mut findings = Vec::new();

        let emissions = self.run_checklist(record, EMISSION_CHECKS, &mut findings);
        let targets = self.run_checklist(record, TARGET_CHECKS, &mut findings);
        let risks = self.run_checklist(record, RISK_CHECKS, &mut findings);

        let overall =
            emissions * EMISSIONS_WEIGHT + targets * TARGETS_WEIGHT + risks * RISKS_WEIGHT;

        Ok(ValidationResult::scored(self.name(), overall)
            .with_findings(findings)
            .with_meta(
                "sub_scores",
                serde_json::json!({
                    "emissions": emissions,
                    "targets": targets,
                    "risks": risks,
                }),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EmissionEntry, RiskEntry, RiskKind, TargetEntry};

    #[test]
    fn empty_record_scores_zero_with_all_findings() {
        let record = DisclosureRecord::new("Acme", 2023);
        let result = QuantificationValidator::new().validate(&record).unwrap();
        assert_eq!(result.score, Some(0.0));
        // 7 emission + 5 target + 4 risk items all unmet
        assert_eq!(result.findings.len(), 16);
        assert!(result.findings.iter().all(|f| f.severity == Severity::Warning));
    }

    #[test]
    fn full_emissions_checklist() {
        let mut record = DisclosureRecord::new("Acme", 2023);
        let mut scope1 = EmissionEntry::new(EmissionScope::Scope1).with_value(100.0);
        scope1.baseline_year = Some(2019);
        scope1.intensity_value = Some(0.8);
        scope1.methodology = Some("GHG Protocol".to_string());
        scope1.assurance_level = Some("limited".to_string());
        record.emissions.push(scope1);
        record
            .emissions
            .push(EmissionEntry::new(EmissionScope::Scope2).with_value(50.0));
        record
            .emissions
            .push(EmissionEntry::new(EmissionScope::Scope3).with_value(400.0));

        let result = QuantificationValidator::new().validate(&record).unwrap();
        let subs = &result.metadata["sub_scores"];
        assert_eq!(subs["emissions"], 1.0);
        assert!(!result.findings.iter().any(|f| f.code.starts_with("QUANT-SCOPE")));
    }

    #[test]
    fn weighting_matches_fixed_split() {
        let mut record = DisclosureRecord::new("Acme", 2023);
        // All 5 target items met, nothing else.
        let mut target = TargetEntry::new("Cut 50% by 2030");
        target.reduction_pct = Some(50.0);
        target.target_year = Some(2030);
        target.base_year = Some(2019);
        target.interim_targets.push("25% by 2025".to_string());
        target.scopes_covered.push(EmissionScope::Scope1);
        record.targets.push(target);

        let result = QuantificationValidator::new().validate(&record).unwrap();
        let score = result.score.unwrap();
        assert!((score - 0.35).abs() < 1e-9);
    }

    #[test]
    fn partial_risk_checklist() {
        let mut record = DisclosureRecord::new("Acme", 2023);
        let mut risk = RiskEntry::new(RiskKind::Physical, "acute_physical", "Flooding");
        risk.financial_impact_value = Some(1_000_000.0);
        risk.time_horizon = Some("medium".to_string());
        record.risks.push(risk);

        let result = QuantificationValidator::new().validate(&record).unwrap();
        let subs = &result.metadata["sub_scores"];
        assert_eq!(subs["risks"], 0.5);
        assert!(result.findings.iter().any(|f| f.code == "QUANT-LIKELIHOOD"));
        assert!(result.findings.iter().any(|f| f.code == "QUANT-MITIGATION"));
    }
}
