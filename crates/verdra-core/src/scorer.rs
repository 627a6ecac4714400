//! Weighted aggregation of validation results into the final graded score.
//!
//! Internal dimensions carry the base score; external cross-validation acts
//! as a penalty on top, never as a base dimension. Null-score results are
//! excluded entirely.

use chrono::Utc;
use std::collections::BTreeMap;

use crate::finding::{AggregatedResult, CrossValidationSummary, Severity, ValidationResult};
use crate::record::DisclosureRecord;

/// Points deducted per critical finding reported by an adapter.
const ADAPTER_CRITICAL_PENALTY: f64 = 5.0;

/// Grade thresholds, descending; first match wins.
const GRADE_MAP: &[(f64, &str)] = &[(90.0, "A"), (80.0, "B"), (70.0, "C"), (60.0, "D"), (0.0, "F")];

/// Aggregates multi-dimensional validation results into a composite score.
pub struct Scorer {
    weights: BTreeMap<String, f64>,
}

impl Scorer {
    /// Scorer with the default dimension weights.
    pub fn new() -> Self {
        Self {
            weights: Self::default_weights(),
        }
    }

    /// Scorer with caller-supplied weights (dimension name -> weight).
    pub fn with_weights(weights: BTreeMap<String, f64>) -> Self {
        Self { weights }
    }

    pub fn default_weights() -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("consistency".to_string(), 0.25),
            ("quantification".to_string(), 0.30),
            ("completeness".to_string(), 0.25),
            ("risk_coverage".to_string(), 0.20),
        ])
    }

    /// Letter grade for an overall score.
    pub fn grade(overall: f64) -> &'static str {
        for (threshold, grade) in GRADE_MAP {
            if overall >= *threshold {
                return grade;
            }
        }
        "F"
    }

    /// Aggregate validation results into the final composite result.
    pub fn aggregate(
        &self,
        record: &DisclosureRecord,
        results: Vec<ValidationResult>,
    ) -> AggregatedResult {
        // Internal dimension scores; null scores are excluded, adapters are
        // penalty-only.
        let mut dimension_scores = BTreeMap::new();
        for result in &results {
            if let Some(score) = result.score {
                if !result.is_adapter() {
                    dimension_scores.insert(result.validator_name.clone(), score);
                }
            }
        }

        let mut overall: f64 = self
            .weights
            .iter()
            .map(|(dim, weight)| dimension_scores.get(dim).copied().unwrap_or(0.0) * weight)
            .sum::<f64>()
            * 100.0;

        // External cross-validation adjustment
        let adapter_results: Vec<&ValidationResult> =
            results.iter().filter(|r| r.is_adapter()).collect();
        let penalty = adapter_results
            .iter()
            .map(|r| r.count_severity(Severity::Critical) as f64 * ADAPTER_CRITICAL_PENALTY)
            .sum::<f64>();
        overall = (overall - penalty).max(0.0);

        let grade = Self::grade(overall);
        let summary = self.build_summary(record, overall, grade, &dimension_scores);

        let cross_validation = if adapter_results.is_empty() {
            None
        } else {
            Some(CrossValidationSummary {
                adapters_used: adapter_results
                    .iter()
                    .map(|r| r.validator_name.clone())
                    .collect(),
                penalty_applied: penalty,
            })
        };

        AggregatedResult {
            company_name: record.company_name.clone(),
            overall_score: (overall * 10.0).round() / 10.0,
            grade: grade.to_string(),
            dimension_scores: dimension_scores
                .into_iter()
                .map(|(k, v)| (k, (v * 1000.0).round() / 10.0))
                .collect(),
            validation_results: results,
            cross_validation,
            summary,
            generated_at: Utc::now(),
        }
    }

    fn build_summary(
        &self,
        record: &DisclosureRecord,
        overall: f64,
        grade: &str,
        dimensions: &BTreeMap<String, f64>,
    ) -> String {
        let weakest = dimensions
            .iter()
            .fold(None::<(&String, f64)>, |acc, (name, score)| match acc {
                Some((_, best)) if best <= *score => acc,
                _ => Some((name, *score)),
            })
            .map(|(name, _)| name.as_str())
            .unwrap_or("n/a");

        format!(
            "{} ({}) scores {:.0}/100 (Grade {}). Weakest dimension: {}.",
            record.company_name, record.report_year, overall, grade, weakest
        )
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}
