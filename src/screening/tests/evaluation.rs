use super::common::*;
use crate::screening::domain::{FieldValue, PatientField, SingleField};
use crate::screening::evaluation::{evaluate, evaluate_entry, EvaluationMode};
use crate::screening::knowledge::{Comparison, Condition, ExactValue};

fn number(field: PatientField, value: f64) -> SingleField<'static> {
    SingleField::new(field, FieldValue::Number(value))
}

fn holds(value: f64, comparison: Comparison) -> bool {
    let condition = Condition::single(PatientField::FastingGlucose, comparison);
    evaluate(
        &number(PatientField::FastingGlucose, value),
        &condition,
        EvaluationMode::FirstEntry,
    )
}

#[test]
fn at_least_includes_the_threshold() {
    assert!(holds(100.0, Comparison::AtLeast(100.0)));
    assert!(!holds(99.999, Comparison::AtLeast(100.0)));
}

#[test]
fn less_than_excludes_the_threshold() {
    assert!(!holds(100.0, Comparison::LessThan(100.0)));
    assert!(holds(99.999, Comparison::LessThan(100.0)));
}

#[test]
fn range_is_inclusive_on_both_ends() {
    let range = || Comparison::Range {
        low: 70.0,
        high: 99.0,
    };
    assert!(holds(70.0, range()));
    assert!(holds(99.0, range()));
    assert!(!holds(69.999, range()));
    assert!(!holds(99.001, range()));
}

#[test]
fn empty_condition_never_matches() {
    let empty = Condition::default();
    for mode in [EvaluationMode::FirstEntry, EvaluationMode::AllEntries] {
        assert!(!evaluate(&patient(), &empty, mode));
        assert!(!evaluate(
            &number(PatientField::Age, 0.0),
            &empty,
            mode
        ));
    }
}

#[test]
fn missing_field_fails_instead_of_matching() {
    let condition = Condition::single(PatientField::Bmi, Comparison::LessThan(100.0));
    let view = number(PatientField::Age, 30.0);
    assert!(!evaluate(&view, &condition, EvaluationMode::FirstEntry));
}

#[test]
fn numeric_checks_fail_on_non_numeric_or_unmeasured_values() {
    let unmeasured = SingleField::new(PatientField::RandomGlucose, FieldValue::Null);
    let text = SingleField::new(PatientField::RandomGlucose, FieldValue::Text("200"));

    for view in [unmeasured, text] {
        assert!(!evaluate_entry(
            &view,
            &entry(PatientField::RandomGlucose, Comparison::AtLeast(0.0))
        ));
        assert!(!evaluate_entry(
            &view,
            &entry(PatientField::RandomGlucose, Comparison::LessThan(1_000.0))
        ));
    }
}

#[test]
fn contains_all_requires_every_element() {
    let required = Comparison::ContainsAll(vec!["A".to_string(), "B".to_string()]);
    let condition = Condition::single(PatientField::RiskFactors, required);

    let mut record = patient();
    record.risk_factors = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    assert!(evaluate(&record, &condition, EvaluationMode::FirstEntry));

    record.risk_factors.retain(|factor| factor != "B");
    assert!(!evaluate(&record, &condition, EvaluationMode::FirstEntry));
}

#[test]
fn contains_all_rejects_scalar_values() {
    let condition = Condition::single(
        PatientField::Pregnancy,
        Comparison::ContainsAll(vec!["no".to_string()]),
    );
    assert!(!evaluate(&patient(), &condition, EvaluationMode::FirstEntry));
}

#[test]
fn symptom_membership_is_exact() {
    let mut record = patient();
    record.symptoms = vec!["Polyuria".to_string()];

    let exact = Condition::single(
        PatientField::Symptoms,
        Comparison::Includes("Polyuria".to_string()),
    );
    let different_case = Condition::single(
        PatientField::Symptoms,
        Comparison::Includes("polyuria".to_string()),
    );

    assert!(evaluate(&record, &exact, EvaluationMode::FirstEntry));
    assert!(!evaluate(&record, &different_case, EvaluationMode::FirstEntry));
}

#[test]
fn equality_does_not_coerce_between_text_and_numbers() {
    let record = patient();
    let text_age = Condition::single(
        PatientField::Age,
        Comparison::Equals(ExactValue::Text("52".to_string())),
    );
    let numeric_age = Condition::single(
        PatientField::Age,
        Comparison::Equals(ExactValue::Number(52.0)),
    );
    let pregnancy = Condition::single(
        PatientField::Pregnancy,
        Comparison::Equals(ExactValue::Text("no".to_string())),
    );

    assert!(!evaluate(&record, &text_age, EvaluationMode::FirstEntry));
    assert!(evaluate(&record, &numeric_age, EvaluationMode::FirstEntry));
    assert!(evaluate(&record, &pregnancy, EvaluationMode::FirstEntry));
}

// Legacy rules only ever consult the first entry of a multi-field condition;
// `AllEntries` is the conjunctive reading kept behind configuration.
#[test]
fn first_entry_mode_ignores_later_entries() {
    let record = patient();
    let condition = Condition::new(vec![
        entry(PatientField::FastingGlucose, Comparison::AtLeast(126.0)),
        entry(PatientField::Bmi, Comparison::LessThan(18.5)),
    ]);

    assert!(evaluate(&record, &condition, EvaluationMode::FirstEntry));
    assert!(!evaluate(&record, &condition, EvaluationMode::AllEntries));
}

#[test]
fn first_entry_mode_fails_when_first_entry_fails() {
    let record = patient();
    let condition = Condition::new(vec![
        entry(PatientField::Bmi, Comparison::LessThan(18.5)),
        entry(PatientField::FastingGlucose, Comparison::AtLeast(126.0)),
    ]);

    assert!(!evaluate(&record, &condition, EvaluationMode::FirstEntry));
    assert!(!evaluate(&record, &condition, EvaluationMode::AllEntries));
}

#[test]
fn all_entries_mode_matches_when_every_entry_holds() {
    let record = patient();
    let condition = Condition::new(vec![
        entry(PatientField::FastingGlucose, Comparison::AtLeast(126.0)),
        entry(PatientField::Hba1c, Comparison::AtLeast(6.5)),
    ]);

    assert!(evaluate(&record, &condition, EvaluationMode::AllEntries));
}
