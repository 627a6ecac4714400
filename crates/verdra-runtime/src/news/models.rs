//! Data models for the news cross-referencing subsystem.

use serde::{Deserialize, Serialize};
use verdra_core::Severity;

/// A news article returned by a search backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,

    /// Publisher (Reuters, Bloomberg, ...)
    pub source: String,

    /// YYYY-MM-DD
    pub published_date: String,

    /// Summary or description text
    pub snippet: String,

    /// Backend-reported relevance, 0.0 when the backend has none
    #[serde(default)]
    pub relevance_score: f64,
}

/// Kind of environmental event extracted from an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Fine,
    Lawsuit,
    Accident,
    Regulation,
    Violation,
    Investigation,
    NgoReport,
    Other,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Fine => "fine",
            EventKind::Lawsuit => "lawsuit",
            EventKind::Accident => "accident",
            EventKind::Regulation => "regulation",
            EventKind::Violation => "violation",
            EventKind::Investigation => "investigation",
            EventKind::NgoReport => "ngo_report",
            EventKind::Other => "other",
        }
    }

    /// Parse a wire label; anything unrecognized becomes `Other`.
    pub fn parse_lenient(label: &str) -> Self {
        match label {
            "fine" => EventKind::Fine,
            "lawsuit" => EventKind::Lawsuit,
            "accident" => EventKind::Accident,
            "regulation" => EventKind::Regulation,
            "violation" => EventKind::Violation,
            "investigation" => EventKind::Investigation,
            "ngo_report" => EventKind::NgoReport,
            _ => EventKind::Other,
        }
    }

    /// Events that indicate enforcement or wrongdoing.
    pub fn is_adverse(&self) -> bool {
        matches!(self, EventKind::Fine | EventKind::Lawsuit | EventKind::Violation)
    }
}

/// Severity of an extracted event, as judged by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl EventSeverity {
    /// Parse a wire label; anything unrecognized defaults to `Medium`.
    pub fn parse_lenient(label: &str) -> Self {
        match label {
            "critical" => EventSeverity::Critical,
            "high" => EventSeverity::High,
            "medium" => EventSeverity::Medium,
            "low" => EventSeverity::Low,
            _ => EventSeverity::Medium,
        }
    }
}

/// A structured environmental event extracted from one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalEvent {
    pub kind: EventKind,
    pub description: String,

    /// Event date (not article date), YYYY-MM-DD when parseable
    pub date: String,

    pub severity: EventSeverity,

    /// Reported financial impact in USD
    #[serde(default)]
    pub financial_impact: Option<f64>,

    pub source_article: NewsArticle,

    #[serde(default)]
    pub keywords: Vec<String>,

    /// Extraction confidence in [0, 1]
    pub confidence: f64,
}

impl EnvironmentalEvent {
    /// The calendar year of the event date, when parseable.
    pub fn year(&self) -> Option<i32> {
        self.date.split('-').next()?.parse().ok()
    }
}

/// Kind of detected contradiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionKind {
    Omission,
    Misrepresentation,
    TimingMismatch,
    MagnitudeMismatch,
}

impl ContradictionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContradictionKind::Omission => "omission",
            ContradictionKind::Misrepresentation => "misrepresentation",
            ContradictionKind::TimingMismatch => "timing_mismatch",
            ContradictionKind::MagnitudeMismatch => "magnitude_mismatch",
        }
    }
}

/// Severity tier of a contradiction, derived from the triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionSeverity {
    Critical,
    Warning,
    Info,
}

impl From<EventSeverity> for ContradictionSeverity {
    fn from(severity: EventSeverity) -> Self {
        match severity {
            EventSeverity::Critical => ContradictionSeverity::Critical,
            EventSeverity::High | EventSeverity::Medium => ContradictionSeverity::Warning,
            EventSeverity::Low => ContradictionSeverity::Info,
        }
    }
}

impl From<ContradictionSeverity> for Severity {
    fn from(severity: ContradictionSeverity) -> Self {
        match severity {
            ContradictionSeverity::Critical => Severity::Critical,
            ContradictionSeverity::Warning => Severity::Warning,
            ContradictionSeverity::Info => Severity::Info,
        }
    }
}

/// A detected mismatch between the disclosure and external evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contradiction {
    pub kind: ContradictionKind,
    pub severity: ContradictionSeverity,

    /// The claim in the report, when one can be pointed at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_in_report: Option<String>,

    /// What the news evidence says
    pub evidence_from_news: String,

    /// The triggering event
    pub event: EnvironmentalEvent,

    /// Impact on the credibility score; always negative
    pub impact_on_credibility: f64,

    pub recommendation: String,
}
