//! Contradiction detection between a disclosure record and news events.
//!
//! Four independent detectors: omission, misrepresentation, timing mismatch,
//! magnitude mismatch. Each runs over every event; no deduplication across
//! detectors, so one event can legitimately surface several contradictions.

use lazy_static::lazy_static;
use regex::Regex;

use verdra_core::DisclosureRecord;

use super::models::{
    Contradiction, ContradictionKind, ContradictionSeverity, EnvironmentalEvent, EventKind,
};

lazy_static! {
    /// Positive environmental claim patterns a company might make.
    static ref POSITIVE_CLAIM_PATTERNS: Vec<Regex> = [
        r"carbon[\s-]?neutral",
        r"zero[\s-]?emission",
        r"climate[\s-]?positive",
        r"sustainable practice",
        r"environmentally friendly",
        r"green initiative",
        r"clean energy",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    /// Dollar figures with an optional million/billion suffix.
    static ref FINANCIAL_FIGURE: Regex =
        Regex::new(r"(?i)\$\s*(\d+(?:,\d{3})*(?:\.\d+)?)\s*(million|billion|bn)?").unwrap();
}

/// Negative keywords a news description would carry for each adverse kind.
fn negative_indicators(kind: EventKind) -> &'static [&'static str] {
    match kind {
        EventKind::Fine => &["fine", "penalty", "violation"],
        EventKind::Lawsuit => &["lawsuit", "legal", "court"],
        EventKind::Violation => &["violation", "breach", "non-compliance"],
        EventKind::Accident => &["accident", "spill", "leak", "incident"],
        _ => &[],
    }
}

/// Relative difference beyond which two financial figures contradict.
const MAGNITUDE_TOLERANCE: f64 = 0.5;

/// Cross-validates a disclosure against extracted news events.
pub struct CrossValidator;

impl CrossValidator {
    pub fn new() -> Self {
        Self
    }

    /// Run all four detectors and collect every contradiction.
    pub fn validate(
        &self,
        record: &DisclosureRecord,
        events: &[EnvironmentalEvent],
    ) -> Vec<Contradiction> {
        let narrative = record.narrative();

        let mut contradictions = Vec::new();
        contradictions.extend(self.check_omissions(&narrative, events));
        contradictions.extend(self.check_misrepresentations(&narrative, events));
        contradictions.extend(self.check_timing_mismatches(record, &narrative, events));
        contradictions.extend(self.check_magnitude_mismatches(record, events));
        contradictions
    }

    /// Adverse events with no lexical trace in the record at all.
    fn check_omissions(
        &self,
        narrative: &str,
        events: &[EnvironmentalEvent],
    ) -> Vec<Contradiction> {
        events
            .iter()
            .filter(|event| event.kind.is_adverse())
            .filter(|event| !has_lexical_trace(event, narrative))
            .map(|event| {
                let severity = ContradictionSeverity::from(event.severity);
                Contradiction {
                    kind: ContradictionKind::Omission,
                    severity,
                    claim_in_report: None,
                    evidence_from_news: event.description.clone(),
                    event: event.clone(),
                    impact_on_credibility: omission_impact(severity),
                    recommendation: "Disclose all material environmental penalties and legal \
                                     proceedings in the risks section"
                        .to_string(),
                }
            })
            .collect()
    }

    /// Positive claims in the record coexisting with negative news.
    fn check_misrepresentations(
        &self,
        narrative: &str,
        events: &[EnvironmentalEvent],
    ) -> Vec<Contradiction> {
        let mut contradictions = Vec::new();

        for event in events {
            let indicators = negative_indicators(event.kind);
            if indicators.is_empty() {
                continue;
            }
            let description = event.description.to_lowercase();

            for pattern in POSITIVE_CLAIM_PATTERNS.iter() {
                if !pattern.is_match(narrative) {
                    continue;
                }
                if indicators.iter().any(|ind| description.contains(ind)) {
                    let severity = ContradictionSeverity::from(event.severity);
                    contradictions.push(Contradiction {
                        kind: ContradictionKind::Misrepresentation,
                        severity,
                        claim_in_report: Some(format!(
                            "Company claims '{}' but news reports {}: {}",
                            pattern.as_str(),
                            event.kind.as_str(),
                            event.description
                        )),
                        evidence_from_news: event.description.clone(),
                        event: event.clone(),
                        impact_on_credibility: omission_impact(severity),
                        recommendation: "Align environmental claims with actual performance and \
                                         disclose any discrepancies"
                            .to_string(),
                    });
                    break; // one contradiction per event is enough
                }
            }
        }

        contradictions
    }

    /// Events dated inside the report year that left no trace in the record.
    fn check_timing_mismatches(
        &self,
        record: &DisclosureRecord,
        narrative: &str,
        events: &[EnvironmentalEvent],
    ) -> Vec<Contradiction> {
        events
            .iter()
            .filter(|event| event.year() == Some(record.report_year))
            .filter(|event| !has_lexical_trace(event, narrative))
            .map(|event| {
                let severity = ContradictionSeverity::from(event.severity);
                Contradiction {
                    kind: ContradictionKind::TimingMismatch,
                    severity,
                    claim_in_report: Some(format!(
                        "Event occurred in {} but was not disclosed",
                        record.report_year
                    )),
                    evidence_from_news: format!(
                        "Event reported on {}: {}",
                        event.date, event.description
                    ),
                    event: event.clone(),
                    impact_on_credibility: timing_impact(severity),
                    recommendation: "Ensure timely disclosure of all material environmental events"
                        .to_string(),
                }
            })
            .collect()
    }

    /// Disclosed financial figures far from the externally reported impact.
    fn check_magnitude_mismatches(
        &self,
        record: &DisclosureRecord,
        events: &[EnvironmentalEvent],
    ) -> Vec<Contradiction> {
        let financial_text = [record.risk_text(), record.target_text()].join(" ");
        let figures = extract_financial_figures(&financial_text);

        let mut contradictions = Vec::new();
        if figures.is_empty() {
            return contradictions;
        }

        for event in events {
            let Some(actual) = event.financial_impact else {
                continue;
            };
            if actual <= 0.0 {
                continue;
            }

            // Compare against the closest disclosed figure: if even that one
            // is off by more than the tolerance, the record understates or
            // overstates the impact.
            let closest = figures
                .iter()
                .copied()
                .min_by(|a, b| {
                    (a - actual)
                        .abs()
                        .partial_cmp(&(b - actual).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap();

            let relative = (actual - closest).abs() / actual.max(closest);
            if relative > MAGNITUDE_TOLERANCE {
                let severity = ContradictionSeverity::from(event.severity);
                contradictions.push(Contradiction {
                    kind: ContradictionKind::MagnitudeMismatch,
                    severity,
                    claim_in_report: Some(format!(
                        "Reported financial impact: ${:.2}, news reports: ${:.2}",
                        closest, actual
                    )),
                    evidence_from_news: format!(
                        "Financial impact of ${:.2} reported in news",
                        actual
                    ),
                    event: event.clone(),
                    impact_on_credibility: magnitude_impact(severity),
                    recommendation: "Provide accurate quantification of financial impacts from \
                                     environmental events"
                        .to_string(),
                });
            }
        }

        contradictions
    }
}

impl Default for CrossValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Does any event keyword or the full description appear in the narrative?
fn has_lexical_trace(event: &EnvironmentalEvent, narrative: &str) -> bool {
    let description = event.description.to_lowercase();
    event
        .keywords
        .iter()
        .map(|kw| kw.to_lowercase())
        .chain(std::iter::once(description))
        .any(|needle| !needle.is_empty() && narrative.contains(&needle))
}

/// Dollar figures from free text, with million/billion suffixes applied.
fn extract_financial_figures(text: &str) -> Vec<f64> {
    FINANCIAL_FIGURE
        .captures_iter(text)
        .filter_map(|caps| {
            let number: f64 = caps[1].replace(',', "").parse().ok()?;
            let multiplier = match caps.get(2).map(|m| m.as_str().to_lowercase()) {
                Some(suffix) if suffix == "million" => 1_000_000.0,
                Some(suffix) if suffix == "billion" || suffix == "bn" => 1_000_000_000.0,
                _ => 1.0,
            };
            Some(number * multiplier)
        })
        .collect()
}

fn omission_impact(severity: ContradictionSeverity) -> f64 {
    match severity {
        ContradictionSeverity::Critical => -30.0,
        ContradictionSeverity::Warning => -15.0,
        ContradictionSeverity::Info => -5.0,
    }
}

fn timing_impact(severity: ContradictionSeverity) -> f64 {
    match severity {
        ContradictionSeverity::Critical | ContradictionSeverity::Warning => -15.0,
        ContradictionSeverity::Info => -5.0,
    }
}

fn magnitude_impact(severity: ContradictionSeverity) -> f64 {
    match severity {
        ContradictionSeverity::Critical | ContradictionSeverity::Warning => -20.0,
        ContradictionSeverity::Info => -10.0,
    }
}
