use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of patient attributes a knowledge-base condition may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatientField {
    FirstName,
    LastName,
    Age,
    Symptoms,
    FastingGlucose,
    Hba1c,
    RandomGlucose,
    Pregnancy,
    Bmi,
    RiskFactors,
    SymptomCount,
}

impl PatientField {
    pub const ALL: [PatientField; 11] = [
        PatientField::FirstName,
        PatientField::LastName,
        PatientField::Age,
        PatientField::Symptoms,
        PatientField::FastingGlucose,
        PatientField::Hba1c,
        PatientField::RandomGlucose,
        PatientField::Pregnancy,
        PatientField::Bmi,
        PatientField::RiskFactors,
        PatientField::SymptomCount,
    ];

    /// Key used for this field in knowledge-base documents.
    pub fn key(&self) -> &'static str {
        match self {
            PatientField::FirstName => "firstName",
            PatientField::LastName => "lastName",
            PatientField::Age => "age",
            PatientField::Symptoms => "symptoms",
            PatientField::FastingGlucose => "fastingGlucose",
            PatientField::Hba1c => "hba1c",
            PatientField::RandomGlucose => "randomGlucose",
            PatientField::Pregnancy => "pregnancy",
            PatientField::Bmi => "bmi",
            PatientField::RiskFactors => "riskFactors",
            PatientField::SymptomCount => "symptomCount",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for PatientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Borrowed view of one patient attribute, tagged by shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
    List(&'a [String]),
    /// Present on the record but not measured.
    Null,
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::List(values) => f.write_str(&values.join(",")),
            FieldValue::Null => f.write_str("null"),
        }
    }
}

/// Anything the condition evaluator can resolve patient fields against.
///
/// `None` means the field is absent from the source, which fails any
/// condition that references it.
pub trait FieldSource {
    fn field(&self, field: PatientField) -> Option<FieldValue<'_>>;
}

/// A source exposing exactly one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleField<'a> {
    field: PatientField,
    value: FieldValue<'a>,
}

impl<'a> SingleField<'a> {
    pub fn new(field: PatientField, value: FieldValue<'a>) -> Self {
        Self { field, value }
    }
}

impl FieldSource for SingleField<'_> {
    fn field(&self, field: PatientField) -> Option<FieldValue<'_>> {
        (field == self.field).then_some(self.value)
    }
}

/// Pregnancy status captured on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pregnancy {
    Yes,
    No,
}

impl Pregnancy {
    pub fn label(&self) -> &'static str {
        match self {
            Pregnancy::Yes => "yes",
            Pregnancy::No => "no",
        }
    }
}

impl Default for Pregnancy {
    fn default() -> Self {
        Pregnancy::No
    }
}

impl std::str::FromStr for Pregnancy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(Pregnancy::Yes),
            "no" | "n" | "false" => Ok(Pregnancy::No),
            other => Err(format!("pregnancy must be 'yes' or 'no', got '{other}'")),
        }
    }
}

/// Patient snapshot evaluated by the rule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub symptoms: Vec<String>,
    pub fasting_glucose: f64,
    pub hba1c: f64,
    #[serde(default)]
    pub random_glucose: Option<f64>,
    pub pregnancy: Pregnancy,
    pub bmi: f64,
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub symptom_count: usize,
}

impl PatientRecord {
    /// Random glucose reading, treating zero as not measured.
    pub fn measured_random_glucose(&self) -> Option<f64> {
        self.random_glucose.filter(|value| *value > 0.0)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

impl FieldSource for PatientRecord {
    fn field(&self, field: PatientField) -> Option<FieldValue<'_>> {
        let value = match field {
            PatientField::FirstName => FieldValue::Text(&self.first_name),
            PatientField::LastName => FieldValue::Text(&self.last_name),
            PatientField::Age => FieldValue::Number(f64::from(self.age)),
            PatientField::Symptoms => FieldValue::List(&self.symptoms),
            PatientField::FastingGlucose => FieldValue::Number(self.fasting_glucose),
            PatientField::Hba1c => FieldValue::Number(self.hba1c),
            PatientField::RandomGlucose => match self.measured_random_glucose() {
                Some(value) => FieldValue::Number(value),
                None => FieldValue::Null,
            },
            PatientField::Pregnancy => FieldValue::Text(self.pregnancy.label()),
            PatientField::Bmi => FieldValue::Number(self.bmi),
            PatientField::RiskFactors => FieldValue::List(&self.risk_factors),
            PatientField::SymptomCount => FieldValue::Number(self.symptom_count as f64),
        };
        Some(value)
    }
}

/// One rule firing against a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub rule_id: String,
    pub description: String,
    pub action: String,
}

/// First/last name split of a free-text patient name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatientName {
    pub first_name: String,
    pub last_name: String,
}

impl PatientName {
    /// Splits on the first space; everything after it is the last name.
    pub fn parse(full_name: &str) -> Self {
        let mut parts = full_name.trim().split(' ');
        let first_name = parts.next().unwrap_or_default().to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");
        Self {
            first_name,
            last_name,
        }
    }
}
