use std::sync::Arc;

use chrono::NaiveDate;
use diabetes_screening::screening::{
    AnalysisReport, DiagnosticEngine, EvaluationMode, KnowledgeBase, KnowledgeBaseError,
    PatientIntake, Pregnancy, Recommendation,
};

fn standard_engine() -> DiagnosticEngine {
    let knowledge = KnowledgeBase::standard().expect("bundled knowledge base loads");
    DiagnosticEngine::new(Arc::new(knowledge))
}

fn intake(first_name: &str, last_name: &str) -> PatientIntake {
    PatientIntake {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age: 34,
        symptoms: Vec::new(),
        fasting_glucose: 88.0,
        hba1c: 5.2,
        random_glucose: None,
        pregnancy: Pregnancy::No,
        bmi: 22.0,
        risk_factors: Vec::new(),
    }
}

#[test]
fn single_threshold_rule_yields_a_diagnosis() {
    let knowledge = KnowledgeBase::from_json_str(
        r#"{
            "rules": [
                {
                    "id": "1",
                    "description": "Fasting glucose diagnostic threshold",
                    "condition": { "fastingGlucose": "≥126" },
                    "action": "Diabetes diagnosis: confirm with physician"
                }
            ],
            "facts": { "symptoms": [], "riskFactors": {} }
        }"#,
    )
    .expect("knowledge base loads");
    let engine = DiagnosticEngine::new(Arc::new(knowledge));

    let mut patient = intake("Ali", "Valiev");
    patient.fasting_glucose = 130.0;
    let analysis = engine.analyze(patient).expect("intake is valid");

    assert_eq!(analysis.matches.len(), 1);
    assert_eq!(analysis.matches[0].rule_id, "1");
    assert_eq!(
        analysis.matches[0].action,
        "Diabetes diagnosis: confirm with physician"
    );
    assert_eq!(analysis.recommendation, Recommendation::DiabetesLikely);
}

#[test]
fn healthy_patient_is_monitored() {
    let analysis = standard_engine()
        .analyze(intake("Dilnoza", "Karimova"))
        .expect("intake is valid");

    let ids: Vec<_> = analysis.matches.iter().map(|m| m.rule_id.as_str()).collect();
    assert_eq!(ids, ["5"]);
    assert_eq!(analysis.recommendation, Recommendation::Monitor);
}

#[test]
fn prediabetes_ranges_fan_out_per_measurement() {
    let mut patient = intake("Bobur", "Rashidov");
    patient.fasting_glucose = 110.0;
    patient.hba1c = 6.0;

    let analysis = standard_engine().analyze(patient).expect("intake is valid");

    let prediabetes: Vec<_> = analysis
        .matches
        .iter()
        .filter(|m| m.rule_id == "4")
        .collect();
    assert_eq!(prediabetes.len(), 2);
    assert!(prediabetes[0].action.contains("impaired fasting glucose"));
    assert!(prediabetes[1].action.contains("HbA1c"));
    assert_eq!(analysis.recommendation, Recommendation::Prediabetes);
}

#[test]
fn ketoacidosis_signs_escalate_to_emergency() {
    let mut patient = intake("Madina", "Yusupova");
    patient.symptoms = vec!["Fruity breath odor".to_string()];

    let analysis = standard_engine().analyze(patient).expect("intake is valid");

    assert!(analysis.matches.iter().any(|m| m.rule_id == "7"));
    assert_eq!(analysis.recommendation, Recommendation::Emergency);
}

#[test]
fn pregnancy_and_risk_profile_rules_trigger() {
    let mut patient = intake("Nodira", "Saidova");
    patient.pregnancy = Pregnancy::Yes;
    patient.age = 46;
    patient.risk_factors = vec!["Family history of diabetes".to_string()];

    let analysis = standard_engine().analyze(patient).expect("intake is valid");

    let ids: Vec<_> = analysis.matches.iter().map(|m| m.rule_id.as_str()).collect();
    assert_eq!(ids, ["5", "8", "9", "9"]);
    assert_eq!(analysis.recommendation, Recommendation::Monitor);
}

#[test]
fn conjunctive_mode_is_opt_in() {
    let knowledge = Arc::new(
        KnowledgeBase::from_json_str(
            r#"{
                "rules": [
                    {
                        "id": "1",
                        "description": "Combined markers",
                        "condition": { "fastingGlucose": "≥126", "hba1c": "≥6.5%" },
                        "action": "Diabetes diagnosis"
                    }
                ],
                "facts": { "symptoms": [], "riskFactors": {} }
            }"#,
        )
        .expect("knowledge base loads"),
    );
    let mut patient = intake("Ali", "Valiev");
    patient.fasting_glucose = 140.0;

    let legacy = DiagnosticEngine::new(Arc::clone(&knowledge))
        .analyze(patient.clone())
        .expect("intake is valid");
    let conjunctive = DiagnosticEngine::new(knowledge)
        .with_mode(EvaluationMode::AllEntries)
        .analyze(patient)
        .expect("intake is valid");

    assert_eq!(legacy.recommendation, Recommendation::DiabetesLikely);
    assert!(conjunctive.matches.is_empty());
}

#[test]
fn unreadable_thresholds_fail_to_load() {
    let err = KnowledgeBase::from_json_str(
        r#"{
            "rules": [
                {
                    "id": "1",
                    "description": "Broken",
                    "condition": { "bmi": "≥overweight" },
                    "action": "Weight management"
                }
            ],
            "facts": { "symptoms": [], "riskFactors": {} }
        }"#,
    )
    .unwrap_err();

    assert!(matches!(err, KnowledgeBaseError::InvalidThreshold { .. }));
}

#[test]
fn report_summarises_the_analysis() {
    let mut patient = intake("Ali", "Valiev");
    patient.hba1c = 7.0;
    let analysis = standard_engine().analyze(patient).expect("intake is valid");
    let date = NaiveDate::from_ymd_opt(2024, 1, 9).expect("valid date");

    let text = AnalysisReport::new(&analysis, date).render();

    assert!(text.starts_with("Analysis Results\nGenerated: 2024-01-09\n"));
    assert!(text.contains("- Rule 2: "));
    assert!(text.ends_with(Recommendation::DiabetesLikely.message()));
}
