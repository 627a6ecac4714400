//! Science Based Targets initiative registry adapter.
//!
//! Verifies that a company claiming an SBTi-validated target actually appears
//! in the initiative's company list. A claim of formal certification that the
//! registry cannot corroborate escalates to critical: an unverifiable hard
//! claim is more consequential than an unverifiable soft one.

use crate::finding::{Finding, Severity, ValidationResult};
use crate::record::DisclosureRecord;

use super::{
    adapter_result_name, adapter_score, CrossCheckOutcome, MatchConfig, NameMatcher,
    ReferenceTable, RegistryAdapter,
};

const DATA_SOURCE_URL: &str = "https://sciencebasedtargets.org/companies-taking-action";

const TARGET_YEAR_COLUMNS: &[&str] = &["Target Year", "target_year"];

/// Adapter over the SBTi companies-taking-action export.
pub struct SbtiAdapter {
    table: Option<ReferenceTable>,
    matcher: NameMatcher,
}

impl SbtiAdapter {
    /// Build the adapter; `None` means no-data mode.
    pub fn new(table: Option<ReferenceTable>) -> Self {
        // Certification lookups want the single best candidate.
        Self::with_config(table, MatchConfig::exact())
    }

    pub fn with_config(table: Option<ReferenceTable>, config: MatchConfig) -> Self {
        Self {
            table,
            matcher: NameMatcher::new(config),
        }
    }

    fn evaluate(&self, table: &ReferenceTable, record: &DisclosureRecord) -> CrossCheckOutcome {
        let Some(company_col) = table.company_column() else {
            return CrossCheckOutcome::Failed {
                reason: "SBTi table has no recognizable company name column".to_string(),
            };
        };

        let names = table.column_values(company_col);
        let best = self.matcher.best_match(&record.company_name, &names);

        let claims_sbti = record
            .targets
            .iter()
            .any(|t| t.is_science_based == Some(true));

        let mut findings = Vec::new();

        match &best {
            None => {
                if claims_sbti {
                    findings.push(
                        Finding::new(
                            self.name(),
                            "SBTI-001",
                            Severity::Critical,
                            "Company claims a science-based target but was not found in the SBTi registry",
                        )
                        .with_recommendation("Verify SBTi status directly with the initiative"),
                    );
                }
            }
            Some(candidate) => {
                if let Some(year_col) = table.column(TARGET_YEAR_COLUMNS) {
                    if let Some(registry_year) = table.cell_i32(candidate.index, year_col) {
                        for target in record.targets.iter().filter(|t| t.is_science_based == Some(true)) {
                            if let Some(disclosed_year) = target.target_year {
                                if disclosed_year != registry_year {
                                    findings.push(
                                        Finding::new(
                                            self.name(),
                                            "SBTI-002",
                                            Severity::Warning,
                                            format!(
                                                "Target year mismatch: disclosed {}, SBTi records {}",
                                                disclosed_year, registry_year
                                            ),
                                        )
                                        .with_field("target_year"),
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }

        let mut result = ValidationResult::scored(adapter_result_name(self.name()), 0.0)
            .with_findings(findings)
            .with_meta("record_found", best.is_some().into());
        if let Some(candidate) = best {
            result = result
                .with_meta("matched_name", candidate.name.clone().into())
                .with_meta("match_ratio", candidate.ratio.into());
        }
        result.score = Some(adapter_score(&result));

        CrossCheckOutcome::Evaluated(result)
    }
}

impl RegistryAdapter for SbtiAdapter {
    fn name(&self) -> &str {
        "sbti"
    }

    fn data_source_url(&self) -> &str {
        DATA_SOURCE_URL
    }

    fn cross_check(&self, record: &DisclosureRecord) -> CrossCheckOutcome {
        match &self.table {
            None => CrossCheckOutcome::DataUnavailable {
                reason: format!("SBTi data not provided. Download from: {}", DATA_SOURCE_URL),
            },
            Some(table) => self.evaluate(table, record),
        }
    }
}
