//! Registry adapters: cross-checking disclosed claims against externally
//! supplied reference tables.
//!
//! Missing data is a first-class outcome, never an error: an adapter built
//! without a reference table reports [`CrossCheckOutcome::DataUnavailable`]
//! and the company is not penalized for it.

mod cdp;
mod custom;
mod matcher;
mod sbti;
mod table;

pub use cdp::CdpAdapter;
pub use custom::CustomAdapter;
pub use matcher::{MatchCandidate, MatchConfig, NameMatcher};
pub use sbti::SbtiAdapter;
pub use table::{ReferenceTable, SectorBenchmark, TableError};

use crate::finding::{Severity, ValidationResult};
use crate::record::DisclosureRecord;

/// The three-way result of an adapter cross-check.
///
/// Modeled as a tagged union rather than error types so the pipeline's
/// branching is exhaustive: missing *data* is never conflated with missing
/// *compliance* or with a genuine fault.
#[derive(Debug)]
pub enum CrossCheckOutcome {
    /// The adapter evaluated the record against its reference data.
    Evaluated(ValidationResult),

    /// No reference dataset was supplied; evaluation was skipped.
    DataUnavailable { reason: String },

    /// The adapter failed for a reason other than missing data.
    Failed { reason: String },
}

/// A registry adapter cross-checking one external dataset.
pub trait RegistryAdapter: Send + Sync {
    /// Short adapter name; results are reported as `adapter:<name>`.
    fn name(&self) -> &str;

    /// Hint for where the caller can obtain the reference dataset.
    fn data_source_url(&self) -> &str;

    /// Cross-check the record against the reference data.
    fn cross_check(&self, record: &DisclosureRecord) -> CrossCheckOutcome;
}

/// Result name for an adapter, e.g. `adapter:sbti`.
pub(crate) fn adapter_result_name(name: &str) -> String {
    format!("adapter:{}", name)
}

/// Adapter scoring rule: each critical finding costs 0.3, floored at zero.
pub(crate) fn adapter_score(result: &ValidationResult) -> f64 {
    let criticals = result.count_severity(Severity::Critical);
    (1.0 - 0.3 * criticals as f64).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Finding;

    #[test]
    fn adapter_score_floors_at_zero() {
        let mut result = ValidationResult::scored("adapter:test", 0.0);
        for i in 0..4 {
            result.findings.push(Finding::new(
                "test",
                format!("T-{:03}", i),
                Severity::Critical,
                "claim not verifiable",
            ));
        }
        assert_eq!(adapter_score(&result), 0.0);
    }

    #[test]
    fn adapter_score_without_criticals_is_full() {
        let result = ValidationResult::scored("adapter:test", 0.0)
            .with_finding(Finding::new("test", "T-001", Severity::Warning, "mismatch"));
        assert_eq!(adapter_score(&result), 1.0);
    }
}
