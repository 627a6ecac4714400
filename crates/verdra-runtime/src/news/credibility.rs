//! Credibility scoring from detected contradictions.
//!
//! Starts at 100 and deducts per contradiction by severity tier. Zero events
//! and zero contradictions is exactly 100: absence of evidence is not
//! evidence of wrongdoing.

use super::models::{Contradiction, ContradictionSeverity};

const CRITICAL_DEDUCTION: f64 = 30.0;
const WARNING_DEDUCTION: f64 = 15.0;
const INFO_DEDUCTION: f64 = 5.0;

/// Calculates the 0-100 credibility score.
pub struct CredibilityScorer;

impl CredibilityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a set of contradictions against the number of events processed.
    pub fn score(&self, contradictions: &[Contradiction], total_events: usize) -> f64 {
        if total_events == 0 && contradictions.is_empty() {
            return 100.0;
        }

        let mut score = 100.0;
        for contradiction in contradictions {
            score -= match contradiction.severity {
                ContradictionSeverity::Critical => CRITICAL_DEDUCTION,
                ContradictionSeverity::Warning => WARNING_DEDUCTION,
                ContradictionSeverity::Info => INFO_DEDUCTION,
            };
        }

        score.max(0.0)
    }

    /// Human label for a credibility score.
    pub fn rating(&self, score: f64) -> &'static str {
        if score >= 90.0 {
            "Excellent"
        } else if score >= 70.0 {
            "Good"
        } else if score >= 50.0 {
            "Fair"
        } else if score >= 30.0 {
            "Poor"
        } else {
            "Very Poor"
        }
    }
}

impl Default for CredibilityScorer {
    fn default() -> Self {
        Self::new()
    }
}
