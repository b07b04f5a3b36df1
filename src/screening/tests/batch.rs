use std::io::Cursor;

use super::common::*;
use crate::screening::batch::{BatchImportError, BatchImporter};
use crate::screening::domain::PatientField;
use crate::screening::evaluation::Recommendation;
use crate::screening::intake::IntakeViolation;

const HEADER: &str =
    "first_name,last_name,age,symptoms,fasting_glucose,hba1c,random_glucose,pregnancy,bmi,risk_factors";

fn csv(rows: &[&str]) -> Cursor<String> {
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    Cursor::new(body)
}

#[test]
fn analyses_each_row_in_order() {
    let engine = standard_engine();
    let input = csv(&[
        "Ali,Valiev,52,,130,6.7,,no,28,",
        "Dilnoza,Karimova,38,Polyuria; Polydipsia,92,5.4,,no,22.5,",
        "Bobur,Rashidov,47,,110,5.9,150,no,31,Family history of diabetes",
    ]);

    let analyses = BatchImporter::from_reader(input, &engine).expect("batch analyses");

    assert_eq!(analyses.len(), 3);
    assert_eq!(analyses[0].recommendation, Recommendation::DiabetesLikely);
    assert_eq!(analyses[0].patient.random_glucose, None);
    assert_eq!(
        analyses[1].patient.symptoms,
        vec!["Polyuria".to_string(), "Polydipsia".to_string()]
    );
    assert_eq!(analyses[1].patient.symptom_count, 2);
    assert_eq!(analyses[1].recommendation, Recommendation::Emergency);
    assert_eq!(analyses[2].recommendation, Recommendation::Prediabetes);
    assert_eq!(
        analyses[2].patient.risk_factors,
        vec!["Family history of diabetes".to_string()]
    );
}

#[test]
fn reports_the_row_of_a_rejected_patient() {
    let engine = standard_engine();
    let input = csv(&[
        "Ali,Valiev,52,,130,6.7,,no,28,",
        "X,Karimova,38,,92,5.4,,no,22.5,",
    ]);

    match BatchImporter::from_reader(input, &engine) {
        Err(BatchImportError::Intake { row, source }) => {
            assert_eq!(row, 2);
            assert!(matches!(
                source,
                IntakeViolation::NameLength {
                    field: PatientField::FirstName,
                    ..
                }
            ));
        }
        other => panic!("expected intake rejection, got {other:?}"),
    }
}

#[test]
fn malformed_rows_surface_csv_errors() {
    let engine = standard_engine();
    let input = csv(&["Ali,Valiev,fifty,,130,6.7,,no,28,"]);

    let err = BatchImporter::from_reader(input, &engine).unwrap_err();
    assert!(matches!(err, BatchImportError::Csv(_)));
}
