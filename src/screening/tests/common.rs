use std::sync::Arc;

use serde_json::Value;

use crate::screening::domain::{PatientField, PatientRecord, Pregnancy, RuleMatch};
use crate::screening::evaluation::DiagnosticEngine;
use crate::screening::intake::PatientIntake;
use crate::screening::knowledge::{Comparison, ConditionEntry, KnowledgeBase};

pub(super) fn patient() -> PatientRecord {
    PatientRecord {
        first_name: "Ali".to_string(),
        last_name: "Valiev".to_string(),
        age: 52,
        symptoms: Vec::new(),
        fasting_glucose: 130.0,
        hba1c: 6.7,
        random_glucose: None,
        pregnancy: Pregnancy::No,
        bmi: 28.0,
        risk_factors: Vec::new(),
        symptom_count: 0,
    }
}

pub(super) fn intake() -> PatientIntake {
    PatientIntake {
        first_name: "Ali".to_string(),
        last_name: "Valiev".to_string(),
        age: 52,
        symptoms: Vec::new(),
        fasting_glucose: 130.0,
        hba1c: 6.7,
        random_glucose: None,
        pregnancy: Pregnancy::No,
        bmi: 28.0,
        risk_factors: Vec::new(),
    }
}

pub(super) fn entry(field: PatientField, comparison: Comparison) -> ConditionEntry {
    ConditionEntry { field, comparison }
}

pub(super) fn knowledge(document: Value) -> KnowledgeBase {
    KnowledgeBase::from_json_str(&document.to_string()).expect("test knowledge base loads")
}

pub(super) fn knowledge_with_rules(rules: Value) -> KnowledgeBase {
    knowledge(serde_json::json!({
        "rules": rules,
        "facts": {
            "symptoms": ["Polyuria", "Polydipsia", "Fatigue"],
            "riskFactors": {
                "demographic": ["Family history of diabetes"],
                "lifestyle": ["Physical inactivity"],
                "medical": ["Hypertension"]
            }
        }
    }))
}

pub(super) fn engine_for(knowledge: KnowledgeBase) -> DiagnosticEngine {
    DiagnosticEngine::new(Arc::new(knowledge))
}

pub(super) fn standard_engine() -> DiagnosticEngine {
    engine_for(KnowledgeBase::standard().expect("bundled knowledge base loads"))
}

pub(super) fn rule_match(rule_id: &str, action: &str) -> RuleMatch {
    RuleMatch {
        rule_id: rule_id.to_string(),
        description: format!("rule {rule_id}"),
        action: action.to_string(),
    }
}
