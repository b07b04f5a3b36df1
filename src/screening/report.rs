use std::fmt;

use chrono::NaiveDate;

use super::evaluation::Analysis;

const UNKNOWN: &str = "Unknown";

/// Printable plain-text rendering of an analysis.
pub struct AnalysisReport<'a> {
    analysis: &'a Analysis,
    generated_on: NaiveDate,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(analysis: &'a Analysis, generated_on: NaiveDate) -> Self {
        Self {
            analysis,
            generated_on,
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AnalysisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patient = &self.analysis.patient;

        writeln!(f, "Analysis Results")?;
        writeln!(f, "Generated: {}", self.generated_on)?;
        writeln!(f, "Patient: {}", format_value(&patient.full_name(), ""))?;
        writeln!(f, "Age: {}", format_value(&patient.age.to_string(), " years"))?;
        writeln!(
            f,
            "Fasting glucose: {}",
            format_value(&patient.fasting_glucose.to_string(), " mg/dL")
        )?;
        writeln!(f, "HbA1c: {}", format_value(&patient.hba1c.to_string(), "%"))?;
        let random_glucose = patient
            .measured_random_glucose()
            .map(|value| value.to_string())
            .unwrap_or_default();
        writeln!(
            f,
            "Random glucose: {}",
            format_value(&random_glucose, " mg/dL")
        )?;
        writeln!(f, "BMI: {}", format_value(&patient.bmi.to_string(), ""))?;
        writeln!(f, "Pregnancy: {}", patient.pregnancy.label())?;
        writeln!(f, "Symptoms: {}", format_list(&patient.symptoms))?;
        writeln!(f, "Risk factors: {}", format_list(&patient.risk_factors))?;

        if self.analysis.matches.is_empty() {
            writeln!(f, "Findings: none")?;
        } else {
            writeln!(f, "Findings:")?;
            for found in &self.analysis.matches {
                writeln!(
                    f,
                    "- Rule {}: {} - {}",
                    found.rule_id, found.description, found.action
                )?;
            }
        }

        write!(f, "Recommendation: {}", self.analysis.message())
    }
}

fn format_value(value: &str, suffix: &str) -> String {
    if value.trim().is_empty() {
        UNKNOWN.to_string()
    } else {
        format!("{value}{suffix}")
    }
}

fn format_list(values: &[String]) -> String {
    if values.is_empty() {
        UNKNOWN.to_string()
    } else {
        values.join(", ")
    }
}
