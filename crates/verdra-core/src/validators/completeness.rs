//! Disclosure coverage checks against the TCFD four-pillar checklist.
//!
//! Eleven fixed items across governance, strategy, risk management and
//! metrics & targets. Sector-specific keyword coverage (SASB-style) is
//! reported when the sector is known but never scored.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use crate::finding::{Finding, Severity, ValidationResult};
use crate::record::DisclosureRecord;

use super::{Validator, ValidatorError};

struct ChecklistItem {
    key: &'static str,
    pillar: &'static str,
    description: &'static str,
    check: fn(&DisclosureRecord) -> bool,
}

lazy_static! {
    static ref ERM_PATTERN: Regex = Regex::new(r"\b(erm|enterprise risk)\b").unwrap();
}

const TCFD_CHECKLIST: &[ChecklistItem] = &[
    ChecklistItem {
        key: "board_oversight",
        pillar: "governance",
        description: "Board-level oversight of climate risks",
        check: |r| r.governance.board_oversight.is_some(),
    },
    ChecklistItem {
        key: "management_role",
        pillar: "governance",
        description: "Management's role in climate assessment",
        check: |r| r.governance.reporting_frequency.is_some(),
    },
    ChecklistItem {
        key: "climate_risks_identified",
        pillar: "strategy",
        description: "Climate-related risks identified",
        check: |r| !r.risks.is_empty(),
    },
    ChecklistItem {
        key: "climate_opportunities",
        pillar: "strategy",
        description: "Climate-related opportunities described",
        check: |r| r.risks.iter().any(|k| k.description.to_lowercase().contains("opportunit")),
    },
    ChecklistItem {
        key: "scenario_analysis",
        pillar: "strategy",
        description: "Scenario analysis conducted",
        check: |r| r.full_text().contains("scenario"),
    },
    ChecklistItem {
        key: "risk_identification_process",
        pillar: "risk_management",
        description: "Process for identifying climate risks",
        check: |r| r.risks.iter().any(|k| !k.category.is_empty()),
    },
    ChecklistItem {
        key: "risk_management_process",
        pillar: "risk_management",
        description: "Process for managing climate risks",
        check: |r| r.risks.iter().any(|k| k.mitigation_strategy.is_some()),
    },
    ChecklistItem {
        key: "integration_with_erm",
        pillar: "risk_management",
        description: "Integration with overall risk management",
        check: |r| ERM_PATTERN.is_match(&r.full_text()),
    },
    ChecklistItem {
        key: "ghg_emissions",
        pillar: "metrics_targets",
        description: "GHG emissions disclosed",
        check: |r| !r.emissions.is_empty(),
    },
    ChecklistItem {
        key: "climate_targets",
        pillar: "metrics_targets",
        description: "Climate-related targets set",
        check: |r| !r.targets.is_empty(),
    },
    ChecklistItem {
        key: "progress_tracking",
        pillar: "metrics_targets",
        description: "Progress against targets tracked",
        check: |r| r.emissions.iter().any(|e| e.baseline_year.is_some()),
    },
];

/// SASB-style sector metric keyword map. Keys are lowercase sector labels.
fn sector_metrics(sector: &str) -> Option<&'static [(&'static str, &'static [&'static str])]> {
    match sector {
        "food_agriculture" => Some(&[
            ("ghg_emissions", &["ghg", "greenhouse gas", "emission", "co2", "carbon"]),
            ("energy_management", &["energy", "efficiency", "renewable"]),
            ("water_management", &["water", "scarcity", "usage"]),
            ("land_use", &["land", "agriculture", "deforestation"]),
            ("supply_chain_environmental", &["supply chain", "supplier", "procurement"]),
            ("packaging_waste", &["packaging", "waste", "recycling"]),
        ]),
        "oil_gas" => Some(&[
            ("ghg_emissions", &["ghg", "greenhouse gas", "emission", "co2", "carbon"]),
            ("air_quality", &["air quality", "pollution", "particulates"]),
            ("water_management", &["water", "scarcity", "usage"]),
            ("biodiversity", &["biodiversity", "habitat", "species", "ecosystem"]),
            ("reserves_valuation", &["reserves", "valuation", "impairment", "stranded"]),
            ("community_impact", &["community", "stakeholder", "local"]),
        ]),
        "financials" => Some(&[
            ("financed_emissions", &["financed", "financing", "portfolio", "lending"]),
            ("climate_risk_exposure", &["exposure", "vulnerability"]),
            ("sustainable_finance_products", &["green bond", "sustainable finance"]),
            ("engagement_policy", &["engagement", "shareholder", "proxy"]),
        ]),
        _ => None,
    }
}

/// Checks disclosure coverage against the TCFD framework checklist.
pub struct CompletenessValidator;

impl CompletenessValidator {
    pub fn new() -> Self {
        Self
    }

    fn sector_coverage(
        &self,
        record: &DisclosureRecord,
        findings: &mut Vec<Finding>,
    ) -> BTreeMap<String, bool> {
        let mut coverage = BTreeMap::new();
        let Some(sector) = record.sector.as_deref() else {
            return coverage;
        };
        let Some(metrics) = sector_metrics(&sector.to_lowercase()) else {
            return coverage;
        };

        let haystack = record.full_text();
        for (metric, keywords) in metrics {
            let covered = keywords.iter().any(|kw| haystack.contains(kw));
            coverage.insert((*metric).to_string(), covered);
            if !covered {
                findings.push(
                    Finding::new(
                        self.name(),
                        format!("COMPL-SECTOR-{}", metric.to_uppercase()),
                        Severity::Info,
                        format!("Sector metric not evidently covered: {}", metric.replace('_', " ")),
                    )
                    .with_field(*metric),
                );
            }
        }
        coverage
    }
}

impl Default for CompletenessValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for CompletenessValidator {
    fn name(&self) -> &'static str {
        "completeness"
    }

    fn validate(&self, record: &DisclosureRecord) -> Result<ValidationResult, ValidatorError> {
        let mut findings = Vec::new();
        let mut tcfd_coverage = BTreeMap::new();
        let mut covered = 0usize;

        for item in TCFD_CHECKLIST {
            let hit = (item.check)(record);
            tcfd_coverage.insert(item.key.to_string(), hit);
            if hit {
                covered += 1;
            } else {
                findings.push(
                    Finding::new(
                        self.name(),
                        format!("COMPL-TCFD-{}", item.key.to_uppercase()),
                        Severity::Warning,
                        format!("TCFD recommended disclosure missing: {}", item.description),
                    )
                    .with_field(format!("{}.{}", item.pillar, item.key)),
                );
            }
        }

        let score = covered as f64 / TCFD_CHECKLIST.len() as f64;

        // Informational only, never part of the score.
        let sector_coverage = self.sector_coverage(record, &mut findings);

        Ok(ValidationResult::scored(self.name(), score)
            .with_findings(findings)
            .with_meta("tcfd_coverage", serde_json::to_value(&tcfd_coverage).unwrap_or_default())
            .with_meta(
                "sector_coverage",
                serde_json::to_value(&sector_coverage).unwrap_or_default(),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EmissionEntry, EmissionScope, RiskEntry, RiskKind, TargetEntry};

    #[test]
    fn empty_record_scores_zero() {
        let record = DisclosureRecord::new("Acme", 2023);
        let result = CompletenessValidator::new().validate(&record).unwrap();
        assert_eq!(result.score, Some(0.0));
        assert_eq!(result.findings.len(), TCFD_CHECKLIST.len());
    }

    #[test]
    fn checklist_has_eleven_items() {
        assert_eq!(TCFD_CHECKLIST.len(), 11);
    }

    #[test]
    fn coverage_counted_per_item() {
        let mut record = DisclosureRecord::new("Acme", 2023);
        record.governance.board_oversight = Some(true);
        record.risks.push(RiskEntry::new(
            RiskKind::Physical,
            "acute_physical",
            "Flooding and the opportunity to harden assets",
        ));
        let mut entry = EmissionEntry::new(EmissionScope::Scope1).with_value(10.0);
        entry.baseline_year = Some(2019);
        record.emissions.push(entry);
        record.targets.push(TargetEntry::new("Cut 30% by 2030"));

        let result = CompletenessValidator::new().validate(&record).unwrap();
        // board_oversight, risks identified, opportunities, risk id process,
        // ghg emissions, climate targets, progress tracking
        assert_eq!(result.score, Some(7.0 / 11.0));
    }

    #[test]
    fn scenario_mention_in_provenance_counts() {
        let mut record = DisclosureRecord::new("Acme", 2023);
        record.source_references.insert(
            "strategy".to_string(),
            "We ran a 2C scenario analysis across segments".to_string(),
        );
        let result = CompletenessValidator::new().validate(&record).unwrap();
        let coverage = &result.metadata["tcfd_coverage"];
        assert_eq!(coverage["scenario_analysis"], true);
    }

    #[test]
    fn erm_requires_word_boundary() {
        let mut record = DisclosureRecord::new("Acme", 2023);
        record
            .source_references
            .insert("risk".to_string(), "thermal plant exposure".to_string());
        let result = CompletenessValidator::new().validate(&record).unwrap();
        assert_eq!(result.metadata["tcfd_coverage"]["integration_with_erm"], false);

        record
            .source_references
            .insert("risk2".to_string(), "integrated with our ERM process".to_string());
        let result = CompletenessValidator::new().validate(&record).unwrap();
        assert_eq!(result.metadata["tcfd_coverage"]["integration_with_erm"], true);
    }

    #[test]
    fn sector_coverage_is_informational_only() {
        let mut with_sector = DisclosureRecord::new("Acme", 2023);
        with_sector.sector = Some("oil_gas".to_string());
        let mut without_sector = with_sector.clone();
        without_sector.sector = None;

        let scored = CompletenessValidator::new().validate(&with_sector).unwrap();
        let baseline = CompletenessValidator::new().validate(&without_sector).unwrap();
        assert_eq!(scored.score, baseline.score);
        assert!(scored
            .findings
            .iter()
            .filter(|f| f.code.starts_with("COMPL-SECTOR-"))
            .all(|f| f.severity == Severity::Info));
    }

    #[test]
    fn unknown_sector_adds_nothing() {
        let mut record = DisclosureRecord::new("Acme", 2023);
        record.sector = Some("aerospace".to_string());
        let result = CompletenessValidator::new().validate(&record).unwrap();
        assert!(!result.findings.iter().any(|f| f.code.starts_with("COMPL-SECTOR-")));
    }
}
