//! Caller-supplied registry adapter.
//!
//! Lets integrators cross-check against their own dataset without writing an
//! adapter: name the source, hand over a table, and matched rows are surfaced
//! as informational findings.

use crate::finding::{Finding, Severity, ValidationResult};
use crate::record::DisclosureRecord;

use super::{
    adapter_result_name, adapter_score, CrossCheckOutcome, MatchConfig, NameMatcher,
    ReferenceTable, RegistryAdapter,
};

/// Adapter over an arbitrary user-supplied reference table.
pub struct CustomAdapter {
    name: String,
    source_url: String,
    table: Option<ReferenceTable>,
    matcher: NameMatcher,
}

impl CustomAdapter {
    pub fn new(name: impl Into<String>, table: Option<ReferenceTable>) -> Self {
        Self {
            name: name.into(),
            source_url: String::new(),
            table,
            matcher: NameMatcher::new(MatchConfig::broad()),
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_match_config(mut self, config: MatchConfig) -> Self {
        self.matcher = NameMatcher::new(config);
        self
    }

    fn evaluate(&self, table: &ReferenceTable, record: &DisclosureRecord) -> CrossCheckOutcome {
        let Some(company_col) = table.company_column() else {
            return CrossCheckOutcome::Failed {
                reason: format!(
                    "{} table has no recognizable company name column",
                    self.name
                ),
            };
        };

        let names = table.column_values(company_col);
        let matches = self.matcher.close_matches(&record.company_name, &names);

        let mut findings = Vec::new();
        if matches.is_empty() {
            findings.push(
                Finding::new(
                    self.name(),
                    "CUSTOM-001",
                    Severity::Info,
                    format!("Company not found in external dataset: {}", record.company_name),
                )
                .with_recommendation("Confirm whether the company should appear in this source"),
            );
        } else {
            for candidate in &matches {
                let row_summary = table
                    .rows()
                    .get(candidate.index)
                    .map(|row| {
                        row.iter()
                            .map(|(k, v)| format!("{}={}", k, v))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                findings.push(
                    Finding::new(
                        self.name(),
                        "CUSTOM-002",
                        Severity::Info,
                        format!("External record found for {}", candidate.name),
                    )
                    .with_evidence(row_summary),
                );
            }
        }

        let mut result = ValidationResult::scored(adapter_result_name(self.name()), 0.0)
            .with_findings(findings)
            .with_meta("records_found", matches.len().into());
        result.score = Some(adapter_score(&result));

        CrossCheckOutcome::Evaluated(result)
    }
}

impl RegistryAdapter for CustomAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn data_source_url(&self) -> &str {
        &self.source_url
    }

    fn cross_check(&self, record: &DisclosureRecord) -> CrossCheckOutcome {
        match &self.table {
            None => CrossCheckOutcome::DataUnavailable {
                reason: if self.source_url.is_empty() {
                    format!("{} data not provided", self.name)
                } else {
                    format!("{} data not provided. Obtain from: {}", self.name, self.source_url)
                },
            },
            Some(table) => self.evaluate(table, record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM_CSV: &str = "\
company,net_zero_target_year,third_party_verification
Acme Industrial,2045,yes
";

    #[test]
    fn no_table_names_the_source() {
        let adapter = CustomAdapter::new("benchmark", None).with_source_url("https://example.org");
        let record = DisclosureRecord::new("Acme Industrial", 2023);
        match adapter.cross_check(&record) {
            CrossCheckOutcome::DataUnavailable { reason } => {
                assert!(reason.contains("benchmark"));
                assert!(reason.contains("https://example.org"));
            }
            other => panic!("expected DataUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn unmatched_company_is_informational() {
        let table = ReferenceTable::from_csv_reader(CUSTOM_CSV.as_bytes()).unwrap();
        let adapter = CustomAdapter::new("benchmark", Some(table));
        let record = DisclosureRecord::new("Initech Holdings", 2023);

        match adapter.cross_check(&record) {
            CrossCheckOutcome::Evaluated(result) => {
                assert_eq!(result.findings.len(), 1);
                assert_eq!(result.findings[0].code, "CUSTOM-001");
                assert_eq!(result.findings[0].severity, Severity::Info);
                assert_eq!(result.score, Some(1.0));
            }
            other => panic!("expected Evaluated, got {:?}", other),
        }
    }

    #[test]
    fn matched_row_is_surfaced_as_evidence() {
        let table = ReferenceTable::from_csv_reader(CUSTOM_CSV.as_bytes()).unwrap();
        let adapter = CustomAdapter::new("benchmark", Some(table));
        let record = DisclosureRecord::new("Acme Industrial", 2023);

        match adapter.cross_check(&record) {
            CrossCheckOutcome::Evaluated(result) => {
                assert_eq!(result.findings[0].code, "CUSTOM-002");
                let evidence = result.findings[0].evidence.as_deref().unwrap();
                assert!(evidence.contains("net_zero_target_year=2045"));
            }
            other => panic!("expected Evaluated, got {:?}", other),
        }
    }
}
