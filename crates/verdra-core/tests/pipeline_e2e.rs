//! End-to-end pipeline behavior over realistic records.

use verdra_core::{
    evaluate, DisclosureRecord, EmissionEntry, EmissionScope, Pipeline, RiskEntry, RiskKind,
    SbtiAdapter, Scorer, Severity, TargetEntry, Validator,
};

/// A record declaring a net-zero target with no interim milestones and
/// Scope 3 at 60% of total emissions with no supply-chain risk entry.
fn greenwash_record() -> DisclosureRecord {
    let mut record = DisclosureRecord::new("Acme Industrial", 2023);
    record.targets.push(TargetEntry::new("Net zero by 2050"));
    record
        .emissions
        .push(EmissionEntry::new(EmissionScope::Scope1).with_value(25.0));
    record
        .emissions
        .push(EmissionEntry::new(EmissionScope::Scope2).with_value(15.0));
    record
        .emissions
        .push(EmissionEntry::new(EmissionScope::Scope3).with_value(60.0));
    record.risks.push(RiskEntry::new(
        RiskKind::Physical,
        "acute_physical",
        "Storm exposure at distribution sites",
    ));
    record
}

#[test]
fn net_zero_without_pathway_and_material_scope3_yield_exactly_two_consistency_findings() {
    let record = greenwash_record();
    let results = Pipeline::default_pipeline().run(&record, false);

    let consistency = results
        .iter()
        .find(|r| r.validator_name == "consistency")
        .unwrap();

    let codes: Vec<&str> = consistency.findings.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(codes, vec!["CONSIST-001", "CONSIST-002"]);
    assert_eq!(consistency.findings[0].severity, Severity::Critical);
    assert_eq!(consistency.findings[1].severity, Severity::Warning);
    assert!(consistency.score.unwrap() < 1.0);
}

#[test]
fn empty_record_has_low_completeness_zero_risk_coverage_and_both_risk_criticals() {
    let record = DisclosureRecord::new("Hollow Corp", 2023);
    let results = Pipeline::default_pipeline().run(&record, false);

    let completeness = results
        .iter()
        .find(|r| r.validator_name == "completeness")
        .unwrap();
    assert!(completeness.score.unwrap() < 0.3);

    let risk = results
        .iter()
        .find(|r| r.validator_name == "risk_coverage")
        .unwrap();
    assert_eq!(risk.score, Some(0.0));
    let criticals: Vec<&str> = risk
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Critical)
        .map(|f| f.code.as_str())
        .collect();
    assert_eq!(criticals, vec!["RISK-001", "RISK-002"]);
}

#[test]
fn no_data_adapter_is_neutral_in_the_final_score() {
    let record = greenwash_record();

    let without_adapter = {
        let results = Pipeline::default_pipeline().run(&record, true);
        Scorer::new().aggregate(&record, results)
    };
    let with_no_data_adapter = {
        let pipeline =
            Pipeline::default_pipeline().with_adapter(Box::new(SbtiAdapter::new(None)));
        let results = pipeline.run(&record, true);
        Scorer::new().aggregate(&record, results)
    };

    assert_eq!(
        without_adapter.overall_score,
        with_no_data_adapter.overall_score
    );
    assert_eq!(
        with_no_data_adapter.cross_validation.unwrap().penalty_applied,
        0.0
    );
}

#[test]
fn validators_are_pure_functions_of_the_record() {
    let record = greenwash_record();
    for validator in verdra_core::default_validators() {
        let first = validator.validate(&record).unwrap();
        let second = validator.validate(&record).unwrap();
        assert_eq!(first, second, "{} differed across runs", validator.name());
    }
}

#[test]
fn aggregated_result_is_always_produced_for_a_valid_record() {
    let record = greenwash_record();
    let aggregated = evaluate(&record);

    assert_eq!(aggregated.validation_results.len(), 4);
    assert!(aggregated.overall_score >= 0.0 && aggregated.overall_score <= 100.0);
    assert!(!aggregated.summary.is_empty());
    assert!(["A", "B", "C", "D", "F"].contains(&aggregated.grade.as_str()));
}

#[test]
fn aggregated_result_serializes_to_json() {
    let record = greenwash_record();
    let aggregated = evaluate(&record);
    let json = serde_json::to_value(&aggregated).unwrap();

    assert_eq!(json["company_name"], "Acme Industrial");
    assert!(json["dimension_scores"].is_object());
    assert!(json["validation_results"].is_array());
}
