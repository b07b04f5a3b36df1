use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::domain::Pregnancy;
use super::evaluation::{Analysis, DiagnosticEngine};
use super::intake::{IntakeViolation, PatientIntake};

const LIST_SEPARATOR: char = ';';

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Intake { row: usize, source: IntakeViolation },
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read patient batch: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid patient CSV data: {}", err),
            BatchImportError::Intake { row, source } => {
                write!(f, "patient on row {} rejected: {}", row, source)
            }
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
            BatchImportError::Intake { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct IntakeRow {
    first_name: String,
    last_name: String,
    age: u32,
    #[serde(default)]
    symptoms: String,
    fasting_glucose: f64,
    hba1c: f64,
    #[serde(default)]
    random_glucose: Option<f64>,
    pregnancy: Pregnancy,
    bmi: f64,
    #[serde(default)]
    risk_factors: String,
}

impl From<IntakeRow> for PatientIntake {
    fn from(row: IntakeRow) -> Self {
        PatientIntake {
            first_name: row.first_name,
            last_name: row.last_name,
            age: row.age,
            symptoms: split_list(&row.symptoms),
            fasting_glucose: row.fasting_glucose,
            hba1c: row.hba1c,
            random_glucose: row.random_glucose,
            pregnancy: row.pregnancy,
            bmi: row.bmi,
            risk_factors: split_list(&row.risk_factors),
        }
    }
}

/// Analyses every patient row of a CSV intake export.
pub struct BatchImporter;

impl BatchImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        engine: &DiagnosticEngine,
    ) -> Result<Vec<Analysis>, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, engine)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        engine: &DiagnosticEngine,
    ) -> Result<Vec<Analysis>, BatchImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut analyses = Vec::new();

        for (index, row) in csv_reader.deserialize::<IntakeRow>().enumerate() {
            let intake = PatientIntake::from(row?);
            let analysis = engine
                .analyze(intake)
                .map_err(|source| BatchImportError::Intake {
                    row: index + 1,
                    source,
                })?;
            analyses.push(analysis);
        }

        info!(patients = analyses.len(), "patient batch analysed");
        Ok(analyses)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
