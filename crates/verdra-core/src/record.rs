//! Disclosure record parsing from JSON/YAML.
//!
//! The record is the shared input contract for every validator and adapter.
//! It is produced upstream (by an LLM extractor over report text) and is
//! immutable for the lifetime of an evaluation.
//!
//! Absence of data is meaningful: an empty list means "not disclosed", never
//! "disclosed as zero".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when parsing disclosure records.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read record file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid record: {0}")]
    Invalid(String),
}

/// GHG Protocol emission scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmissionScope {
    #[serde(rename = "scope_1")]
    Scope1,
    #[serde(rename = "scope_2")]
    Scope2,
    #[serde(rename = "scope_3")]
    Scope3,
}

impl EmissionScope {
    /// Wire label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmissionScope::Scope1 => "scope_1",
            EmissionScope::Scope2 => "scope_2",
            EmissionScope::Scope3 => "scope_3",
        }
    }
}

fn default_unit() -> String {
    "tCO2e".to_string()
}

/// A single disclosed emission figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionEntry {
    /// Scope is the only mandatory field; everything else may be undisclosed.
    pub scope: EmissionScope,

    /// Absolute value in `unit`
    #[serde(default)]
    pub value: Option<f64>,

    #[serde(default = "default_unit")]
    pub unit: String,

    /// Reporting year of this figure
    #[serde(default)]
    pub year: Option<i32>,

    /// Baseline year the figure is tracked against
    #[serde(default)]
    pub baseline_year: Option<i32>,

    /// Intensity metric value (e.g. tCO2e per million revenue)
    #[serde(default)]
    pub intensity_value: Option<f64>,

    #[serde(default)]
    pub intensity_unit: Option<String>,

    /// Stated calculation methodology
    #[serde(default)]
    pub methodology: Option<String>,

    /// Third-party assurance level, if any
    #[serde(default)]
    pub assurance_level: Option<String>,
}

impl EmissionEntry {
    /// A bare entry with only the scope set.
    pub fn new(scope: EmissionScope) -> Self {
        Self {
            scope,
            value: None,
            unit: default_unit(),
            year: None,
            baseline_year: None,
            intensity_value: None,
            intensity_unit: None,
            methodology: None,
            assurance_level: None,
        }
    }

    /// Builder-style absolute value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

/// An emission reduction target commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TargetEntry {
    pub description: String,

    #[serde(default)]
    pub target_year: Option<i32>,

    #[serde(default)]
    pub base_year: Option<i32>,

    /// Committed reduction percentage
    #[serde(default)]
    pub reduction_pct: Option<f64>,

    #[serde(default)]
    pub scopes_covered: Vec<EmissionScope>,

    /// Whether the company labels this a science-based target
    #[serde(default)]
    pub is_science_based: Option<bool>,

    /// SBTi status as disclosed (committed / approved / none)
    #[serde(default)]
    pub sbti_status: Option<String>,

    /// Interim milestones on the pathway to the target
    #[serde(default)]
    pub interim_targets: Vec<String>,
}

impl TargetEntry {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }
}

/// TCFD top-level risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    Physical,
    Transition,
}

impl RiskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskKind::Physical => "physical",
            RiskKind::Transition => "transition",
        }
    }
}

/// A disclosed climate risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub kind: RiskKind,

    /// Sub-category, e.g. "acute_physical", "policy_legal", "supply_chain"
    pub category: String,

    pub description: String,

    /// short / medium / long
    #[serde(default)]
    pub time_horizon: Option<String>,

    /// Qualitative impact description
    #[serde(default)]
    pub financial_impact: Option<String>,

    /// Quantified impact in USD
    #[serde(default)]
    pub financial_impact_value: Option<f64>,

    #[serde(default)]
    pub mitigation_strategy: Option<String>,

    #[serde(default)]
    pub likelihood: Option<String>,
}

impl RiskEntry {
    pub fn new(kind: RiskKind, category: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            category: category.into(),
            description: description.into(),
            time_horizon: None,
            financial_impact: None,
            financial_impact_value: None,
            mitigation_strategy: None,
            likelihood: None,
        }
    }
}

/// Climate governance structure, as disclosed.
///
/// `None` means the report was silent on the point, which is distinct from an
/// explicit `Some(false)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Governance {
    #[serde(default)]
    pub board_oversight: Option<bool>,

    #[serde(default)]
    pub board_climate_committee: Option<bool>,

    #[serde(default)]
    pub executive_incentive_linked: Option<bool>,

    #[serde(default)]
    pub reporting_frequency: Option<String>,
}

fn default_report_type() -> String {
    "sustainability".to_string()
}

/// Structured representation of a company's climate disclosure.
///
/// The core data model of the engine: every validator and adapter consumes
/// this structure as its only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisclosureRecord {
    pub company_name: String,
    pub report_year: i32,

    /// sustainability / annual / cdp
    #[serde(default = "default_report_type")]
    pub report_type: String,

    /// Frameworks the report claims alignment with, e.g. ["TCFD", "CDP"]
    #[serde(default)]
    pub frameworks: Vec<String>,

    #[serde(default)]
    pub sector: Option<String>,

    #[serde(default)]
    pub emissions: Vec<EmissionEntry>,

    #[serde(default)]
    pub targets: Vec<TargetEntry>,

    #[serde(default)]
    pub risks: Vec<RiskEntry>,

    #[serde(default)]
    pub governance: Governance,

    /// Field name -> original text snippet, for audit provenance.
    #[serde(default)]
    pub source_references: BTreeMap<String, String>,

    /// Upstream extractor's confidence in this record
    #[serde(default)]
    pub extraction_confidence: f64,
}

impl DisclosureRecord {
    /// A minimal record with only the identifying fields set.
    pub fn new(company_name: impl Into<String>, report_year: i32) -> Self {
        Self {
            company_name: company_name.into(),
            report_year,
            report_type: default_report_type(),
            frameworks: Vec::new(),
            sector: None,
            emissions: Vec::new(),
            targets: Vec::new(),
            risks: Vec::new(),
            governance: Governance::default(),
            source_references: BTreeMap::new(),
            extraction_confidence: 0.0,
        }
    }

    /// Parse a record from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: DisclosureRecord = serde_json::from_str(json)?;
        record.validate()?;
        Ok(record)
    }

    /// Parse a record from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RecordError> {
        let record: DisclosureRecord = serde_yaml::from_str(yaml)?;
        record.validate()?;
        Ok(record)
    }

    /// Parse a record from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a record from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    fn validate(&self) -> Result<(), RecordError> {
        if self.company_name.trim().is_empty() {
            return Err(RecordError::MissingField("company_name".to_string()));
        }
        if self.report_year < 1900 || self.report_year > 2200 {
            return Err(RecordError::Invalid(format!(
                "implausible report_year: {}",
                self.report_year
            )));
        }
        Ok(())
    }

    /// Concatenated risk descriptions, lowercase.
    pub fn risk_text(&self) -> String {
        self.risks
            .iter()
            .map(|r| r.description.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Concatenated target descriptions, lowercase.
    pub fn target_text(&self) -> String {
        self.targets
            .iter()
            .map(|t| t.description.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Scope/value fragments of disclosed emissions, lowercase.
    pub fn emission_text(&self) -> String {
        self.emissions
            .iter()
            .map(|e| match e.value {
                Some(v) => format!("{} {}", e.scope.as_str(), v),
                None => e.scope.as_str().to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Concatenated provenance snippets, lowercase.
    pub fn provenance_text(&self) -> String {
        self.source_references
            .values()
            .map(|s| s.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The record's free text: risks, targets and emission fragments.
    ///
    /// This is the haystack for lexical cross-checks against external
    /// evidence.
    pub fn narrative(&self) -> String {
        [self.risk_text(), self.target_text(), self.emission_text()].join(" ")
    }

    /// Everything lexical checks may search: narrative plus provenance.
    pub fn full_text(&self) -> String {
        [self.narrative(), self.provenance_text()].join(" ")
    }

    /// Total disclosed absolute emissions across all entries.
    pub fn total_emissions(&self) -> f64 {
        self.emissions.iter().filter_map(|e| e.value).sum()
    }

    /// Total disclosed absolute emissions for one scope.
    pub fn scope_emissions(&self, scope: EmissionScope) -> f64 {
        self.emissions
            .iter()
            .filter(|e| e.scope == scope)
            .filter_map(|e| e.value)
            .sum()
    }
}
