//! Findings and validation results.
//!
//! Every validator and adapter reports through these types. Findings are
//! append-only within a run; results are owned by the pipeline once produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// A single reportable issue or note produced by a validator or adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Source validator or adapter name
    pub validator: String,

    /// Machine-readable issue code, e.g. "CONSIST-001"
    pub code: String,

    pub severity: Severity,

    /// Human-readable description
    pub message: String,

    /// Affected field, if one can be pointed at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Supporting text evidence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Finding {
    pub fn new(
        validator: impl Into<String>,
        code: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            validator: validator.into(),
            code: code.into(),
            severity,
            message: message.into(),
            field: None,
            evidence: None,
            recommendation: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// Output of a single validator or adapter run.
///
/// `score == None` means "could not evaluate"; such results are excluded from
/// aggregation and never penalize the company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub validator_name: String,

    pub score: Option<f64>,

    #[serde(default)]
    pub findings: Vec<Finding>,

    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ValidationResult {
    /// A scored result.
    pub fn scored(validator_name: impl Into<String>, score: f64) -> Self {
        Self {
            validator_name: validator_name.into(),
            score: Some(score),
            findings: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// A result that could not be evaluated.
    pub fn unscored(validator_name: impl Into<String>) -> Self {
        Self {
            validator_name: validator_name.into(),
            score: None,
            findings: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_findings(mut self, findings: Vec<Finding>) -> Self {
        self.findings = findings;
        self
    }

    pub fn with_finding(mut self, finding: Finding) -> Self {
        self.findings.push(finding);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Whether this result came from an external adapter.
    pub fn is_adapter(&self) -> bool {
        self.validator_name.starts_with("adapter:")
    }

    /// Count of findings at the given severity.
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }
}

/// Summary of the external cross-validation phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationSummary {
    /// Adapter result names, in run order
    pub adapters_used: Vec<String>,

    /// Total score penalty applied by the scorer
    pub penalty_applied: f64,
}

/// The final composite result for one evaluation. Terminal artifact, never
/// mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub company_name: String,

    /// 0-100
    pub overall_score: f64,

    /// A / B / C / D / F
    pub grade: String,

    /// Dimension name -> score as a percentage
    pub dimension_scores: BTreeMap<String, f64>,

    pub validation_results: Vec<ValidationResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_validation: Option<CrossValidationSummary>,

    pub summary: String,

    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_builder() {
        let finding = Finding::new("consistency", "CONSIST-001", Severity::Critical, "gap")
            .with_field("targets")
            .with_recommendation("add interim milestones");
        assert_eq!(finding.code, "CONSIST-001");
        assert_eq!(finding.field.as_deref(), Some("targets"));
        assert!(finding.evidence.is_none());
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn adapter_prefix_detection() {
        assert!(ValidationResult::unscored("adapter:sbti").is_adapter());
        assert!(!ValidationResult::scored("consistency", 1.0).is_adapter());
    }

    #[test]
    fn severity_counting() {
        let result = ValidationResult::scored("risk_coverage", 0.0)
            .with_finding(Finding::new("risk_coverage", "RISK-001", Severity::Critical, "a"))
            .with_finding(Finding::new("risk_coverage", "RISK-002", Severity::Critical, "b"))
            .with_finding(Finding::new("risk_coverage", "RISK-003", Severity::Warning, "c"));
        assert_eq!(result.count_severity(Severity::Critical), 2);
        assert_eq!(result.count_severity(Severity::Warning), 1);
        assert_eq!(result.count_severity(Severity::Info), 0);
    }

    #[test]
    fn unscored_serializes_null_score() {
        let result = ValidationResult::unscored("adapter:cdp");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["score"].is_null());
    }
}
