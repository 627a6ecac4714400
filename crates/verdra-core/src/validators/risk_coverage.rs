//! Climate risk breadth and depth checks.
//!
//! Breadth: both TCFD top-level risk families (physical, transition) must be
//! present; missing either is a critical gap. Depth: the fraction of risks
//! carrying a quantified financial impact.

use crate::finding::{Finding, Severity, ValidationResult};
use crate::record::{DisclosureRecord, RiskKind};

use super::{Validator, ValidatorError};

const BREADTH_WEIGHT: f64 = 0.5;
const DEPTH_WEIGHT: f64 = 0.5;

/// Threshold below which the quantification rate itself becomes a finding.
const LOW_QUANTIFICATION_RATE: f64 = 0.3;

/// Assesses the breadth and depth of climate risk disclosure.
pub struct RiskCoverageValidator;

impl RiskCoverageValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RiskCoverageValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RiskCoverageValidator {
    fn name(&self) -> &'static str {
        "risk_coverage"
    }

    fn validate(&self, record: &DisclosureRecord) -> Result<ValidationResult, ValidatorError> {
        let mut findings = Vec::new();

        let has_physical = record.risks.iter().any(|r| r.kind == RiskKind::Physical);
        let has_transition = record.risks.iter().any(|r| r.kind == RiskKind::Transition);

        if !has_physical {
            findings.push(Finding::new(
                self.name(),
                "RISK-001",
                Severity::Critical,
                "No physical climate risks disclosed",
            ));
        }
        if !has_transition {
            findings.push(Finding::new(
                self.name(),
                "RISK-002",
                Severity::Critical,
                "No transition climate risks disclosed",
            ));
        }

        let quantified = record
            .risks
            .iter()
            .filter(|r| r.financial_impact_value.is_some())
            .count();
        let quantification_rate = quantified as f64 / record.risks.len().max(1) as f64;

        if quantification_rate < LOW_QUANTIFICATION_RATE {
            findings.push(Finding::new(
                self.name(),
                "RISK-003",
                Severity::Warning,
                format!(
                    "Only {:.0}% of risks have quantified financial impact",
                    quantification_rate * 100.0
                ),
            ));
        }

        let breadth = (has_physical as u8 + has_transition as u8) as f64 / 2.0;
        let score = breadth * BREADTH_WEIGHT + quantification_rate * DEPTH_WEIGHT;

        Ok(ValidationResult::scored(self.name(), score)
            .with_findings(findings)
            .with_meta("physical_covered", has_physical.into())
            .with_meta("transition_covered", has_transition.into())
            .with_meta("quantification_rate", quantification_rate.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RiskEntry;

    #[test]
    fn no_risks_scores_zero_with_two_criticals() {
        let record = DisclosureRecord::new("Acme", 2023);
        let result = RiskCoverageValidator::new().validate(&record).unwrap();

        assert_eq!(result.score, Some(0.0));
        let criticals: Vec<&str> = result
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .map(|f| f.code.as_str())
            .collect();
        assert_eq!(criticals, vec!["RISK-001", "RISK-002"]);
    }

    #[test]
    fn both_families_quantified_scores_full() {
        let mut record = DisclosureRecord::new("Acme", 2023);
        let mut physical = RiskEntry::new(RiskKind::Physical, "acute_physical", "Flooding");
        physical.financial_impact_value = Some(2_000_000.0);
        let mut transition = RiskEntry::new(RiskKind::Transition, "policy_legal", "Carbon pricing");
        transition.financial_impact_value = Some(5_000_000.0);
        record.risks.push(physical);
        record.risks.push(transition);

        let result = RiskCoverageValidator::new().validate(&record).unwrap();
        assert_eq!(result.score, Some(1.0));
        assert!(result.findings.is_empty());
    }

    #[test]
    fn missing_transition_is_critical() {
        let mut record = DisclosureRecord::new("Acme", 2023);
        record
            .risks
            .push(RiskEntry::new(RiskKind::Physical, "chronic_physical", "Sea level rise"));

        let result = RiskCoverageValidator::new().validate(&record).unwrap();
        assert!(result.findings.iter().any(|f| f.code == "RISK-002"));
        assert!(!result.findings.iter().any(|f| f.code == "RISK-001"));
        // breadth 0.5 * 0.5 + depth 0
        assert_eq!(result.score, Some(0.25));
    }

    #[test]
    fn low_quantification_rate_warns() {
        let mut record = DisclosureRecord::new("Acme", 2023);
        for i in 0..4 {
            record.risks.push(RiskEntry::new(
                RiskKind::Transition,
                "market",
                format!("Demand shift {}", i),
            ));
        }
        record.risks[0].financial_impact_value = Some(100.0);

        let result = RiskCoverageValidator::new().validate(&record).unwrap();
        assert!(result.findings.iter().any(|f| f.code == "RISK-003"));
        assert_eq!(result.metadata["quantification_rate"], 0.25);
    }
}
