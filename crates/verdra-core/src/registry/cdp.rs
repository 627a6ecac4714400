//! Carbon Disclosure Project registry adapter.
//!
//! Checks a company's claimed CDP participation and, when a record is found,
//! compares report year, published score/grade and sector classification.
//! Claiming participation is a softer claim than claiming certification, so
//! an unmatched claim stays at warning severity.

use crate::finding::{Finding, Severity, ValidationResult};
use crate::record::DisclosureRecord;

use super::{
    adapter_result_name, adapter_score, CrossCheckOutcome, MatchConfig, NameMatcher,
    ReferenceTable, RegistryAdapter,
};

const DATA_SOURCE_URL: &str = "https://www.cdp.net/en/responses";

const YEAR_COLUMNS: &[&str] = &["year", "Year", "Response Year"];
const SCORE_COLUMNS: &[&str] = &["score", "Score", "grade", "Grade", "rating", "Rating"];
const SECTOR_COLUMNS: &[&str] = &["sector", "Sector", "Industry", "industry"];

/// Adapter over a CDP questionnaire response export.
pub struct CdpAdapter {
    table: Option<ReferenceTable>,
    matcher: NameMatcher,
}

impl CdpAdapter {
    /// Build the adapter; `None` means no-data mode.
    pub fn new(table: Option<ReferenceTable>) -> Self {
        // Participation registries are broad; several close candidates may apply.
        Self::with_config(table, MatchConfig::broad())
    }

    pub fn with_config(table: Option<ReferenceTable>, config: MatchConfig) -> Self {
        Self {
            table,
            matcher: NameMatcher::new(config),
        }
    }

    fn claims_cdp(record: &DisclosureRecord) -> bool {
        record.frameworks.iter().any(|f| f.eq_ignore_ascii_case("cdp"))
    }

    fn compare_row(
        &self,
        table: &ReferenceTable,
        row: usize,
        record: &DisclosureRecord,
        findings: &mut Vec<Finding>,
    ) {
        if let Some(year_col) = table.column(YEAR_COLUMNS) {
            if let Some(registry_year) = table.cell_i32(row, year_col) {
                if registry_year != record.report_year {
                    findings.push(
                        Finding::new(
                            self.name(),
                            "CDP-002",
                            Severity::Warning,
                            format!(
                                "Report year mismatch: disclosed {}, CDP records {}",
                                record.report_year, registry_year
                            ),
                        )
                        .with_field("report_year"),
                    );
                }
            }
        }

        if let Some(score_col) = table.column(SCORE_COLUMNS) {
            if let Some(score) = table.cell(row, score_col) {
                findings.push(Finding::new(
                    self.name(),
                    "CDP-003",
                    Severity::Info,
                    format!("Company CDP {}: {}", score_col.to_lowercase(), score),
                ));
            }
        }

        if let (Some(sector_col), Some(disclosed_sector)) =
            (table.column(SECTOR_COLUMNS), record.sector.as_deref())
        {
            if let Some(registry_sector) = table.cell(row, sector_col) {
                if !registry_sector.eq_ignore_ascii_case(disclosed_sector) {
                    findings.push(
                        Finding::new(
                            self.name(),
                            "CDP-004",
                            Severity::Info,
                            format!(
                                "Sector difference: disclosed {}, CDP records {}",
                                disclosed_sector, registry_sector
                            ),
                        )
                        .with_field("sector"),
                    );
                }
            }
        }
    }

    fn evaluate(&self, table: &ReferenceTable, record: &DisclosureRecord) -> CrossCheckOutcome {
        let Some(company_col) = table.company_column() else {
            return CrossCheckOutcome::Failed {
                reason: "CDP table has no recognizable company name column".to_string(),
            };
        };

        let names = table.column_values(company_col);
        let matches = self.matcher.close_matches(&record.company_name, &names);

        let mut findings = Vec::new();

        if matches.is_empty() {
            if Self::claims_cdp(record) {
                findings.push(
                    Finding::new(
                        self.name(),
                        "CDP-001",
                        Severity::Warning,
                        "Company claims CDP participation but was not found in the CDP dataset",
                    )
                    .with_recommendation("Verify CDP submission status directly with CDP"),
                );
            }
        } else {
            for candidate in &matches {
                self.compare_row(table, candidate.index, record, &mut findings);
            }
        }

        let mut result = ValidationResult::scored(adapter_result_name(self.name()), 0.0)
            .with_findings(findings)
            .with_meta("records_found", matches.len().into());
        result.score = Some(adapter_score(&result));

        CrossCheckOutcome::Evaluated(result)
    }
}

impl RegistryAdapter for CdpAdapter {
    fn name(&self) -> &str {
        "cdp"
    }

    fn data_source_url(&self) -> &str {
        DATA_SOURCE_URL
    }

    fn cross_check(&self, record: &DisclosureRecord) -> CrossCheckOutcome {
        match &self.table {
            None => CrossCheckOutcome::DataUnavailable {
                reason: format!("CDP data not provided. Download from: {}", DATA_SOURCE_URL),
            },
            Some(table) => self.evaluate(table, record),
        }
    }
}
