//! Internal consistency checks.
//!
//! Evaluates a fixed, ordered table of rules of the form "when the condition
//! applies, the check must hold". A rule whose condition never applies does
//! not penalize: the score is passed / applicable, or 1.0 when nothing
//! applied.

use lazy_static::lazy_static;
use regex::Regex;

use crate::finding::{Finding, Severity, ValidationResult};
use crate::record::{DisclosureRecord, EmissionScope};

use super::{Validator, ValidatorError};

lazy_static! {
    static ref INVESTMENT_KEYWORDS: Vec<&'static str> = vec![
        "investment", "investing", "capital expenditure", "capex", "funding",
    ];

    static ref PROJECT_KEYWORDS: Vec<&'static str> = vec![
        "project", "initiative", "technology", "program", "solution",
    ];

    static ref NET_ZERO: Regex = Regex::new(r"net[\s-]?zero").unwrap();
}

const SUPPLY_CHAIN_CATEGORIES: &[&str] = &["supply_chain", "value_chain", "upstream", "downstream"];

/// One entry of the consistency rule table.
///
/// `condition` decides applicability; `check` decides satisfaction. Both are
/// pure functions of the record so rules can be unit-tested in isolation.
pub struct ConsistencyRule {
    pub code: &'static str,
    pub name: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub condition: fn(&DisclosureRecord) -> bool,
    pub check: fn(&DisclosureRecord) -> bool,
}

fn mentions_net_zero(record: &DisclosureRecord) -> bool {
    record
        .targets
        .iter()
        .any(|t| NET_ZERO.is_match(&t.description.to_lowercase()))
}

fn net_zero_has_interim(record: &DisclosureRecord) -> bool {
    record
        .targets
        .iter()
        .filter(|t| NET_ZERO.is_match(&t.description.to_lowercase()))
        .any(|t| !t.interim_targets.is_empty())
}

/// Scope 3 looks material: more than 40% of total disclosed emissions.
fn scope3_material(record: &DisclosureRecord) -> bool {
    let total = record.total_emissions();
    let scope3 = record.scope_emissions(EmissionScope::Scope3);
    scope3 > 0.0 && total > 0.0 && scope3 / total > 0.4
}

fn has_supply_chain_risk(record: &DisclosureRecord) -> bool {
    record
        .risks
        .iter()
        .any(|r| SUPPLY_CHAIN_CATEGORIES.contains(&r.category.as_str()))
}

fn multiple_targets(record: &DisclosureRecord) -> bool {
    record.targets.len() > 1
}

fn timelines_monotonic(record: &DisclosureRecord) -> bool {
    record.targets.iter().all(|t| match (t.target_year, t.base_year) {
        (Some(target), Some(base)) => target > base,
        _ => true,
    })
}

fn mentions_investment(record: &DisclosureRecord) -> bool {
    let text = record.provenance_text();
    INVESTMENT_KEYWORDS.iter().any(|kw| text.contains(kw))
}

fn has_specific_projects(record: &DisclosureRecord) -> bool {
    let text = record.provenance_text();
    PROJECT_KEYWORDS.iter().any(|kw| text.contains(kw))
}

fn board_oversight_claimed(record: &DisclosureRecord) -> bool {
    record.governance.board_oversight == Some(true)
}

fn incentive_linkage_specified(record: &DisclosureRecord) -> bool {
    record.governance.executive_incentive_linked.is_some()
}

/// The rule table, evaluated in order.
pub const RULES: &[ConsistencyRule] = &[
    ConsistencyRule {
        code: "CONSIST-001",
        name: "net_zero_pathway",
        severity: Severity::Critical,
        message: "Net zero target declared but no interim milestones found",
        condition: mentions_net_zero,
        check: net_zero_has_interim,
    },
    ConsistencyRule {
        code: "CONSIST-002",
        name: "scope3_materiality",
        severity: Severity::Warning,
        message: "Scope 3 appears material (>40% of total) but no supply chain risk disclosed",
        condition: scope3_material,
        check: has_supply_chain_risk,
    },
    ConsistencyRule {
        code: "CONSIST-003",
        name: "target_timeline_logic",
        severity: Severity::Warning,
        message: "Target timeline inconsistency: target year should be after base year",
        condition: multiple_targets,
        check: timelines_monotonic,
    },
    ConsistencyRule {
        code: "CONSIST-004",
        name: "investment_specificity",
        severity: Severity::Info,
        message: "Climate investment mentioned without specific project breakdown",
        condition: mentions_investment,
        check: has_specific_projects,
    },
    ConsistencyRule {
        code: "CONSIST-005",
        name: "governance_action_gap",
        severity: Severity::Warning,
        message: "Board oversight claimed but executive incentive linkage not specified",
        condition: board_oversight_claimed,
        check: incentive_linkage_specified,
    },
];

/// Checks internal consistency of the report: do commitments, data and
/// governance claims line up with each other?
pub struct ConsistencyValidator;

impl ConsistencyValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsistencyValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for ConsistencyValidator {
    fn name(&self) -> &'static str {
        "consistency"
    }

    fn validate(&self, record: &DisclosureRecord) -> Result<ValidationResult, ValidatorError> {
        let mut findings = Vec::new();
        let mut applicable = 0usize;
        let mut passed = 0usize;

        for rule in RULES {
            if (rule.condition)(record) {
                applicable += 1;
                if (rule.check)(record) {
                    passed += 1;
                } else {
                    findings.push(Finding::new(self.name(), rule.code, rule.severity, rule.message));
                }
            }
        }

        let score = if applicable > 0 {
            passed as f64 / applicable as f64
        } else {
            1.0
        };

        Ok(ValidationResult::scored(self.name(), score)
            .with_findings(findings)
            .with_meta("rules_applicable", applicable.into())
            .with_meta("rules_passed", passed.into()))
    }
}
