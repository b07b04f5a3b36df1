use serde::{Deserialize, Serialize};

use super::domain::{PatientField, PatientRecord, Pregnancy};
use super::evaluation::count_symptoms;

/// Raw patient data as submitted by the intake form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientIntake {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub fasting_glucose: f64,
    pub hba1c: f64,
    #[serde(default)]
    pub random_glucose: Option<f64>,
    #[serde(default)]
    pub pregnancy: Pregnancy,
    pub bmi: f64,
    #[serde(default)]
    pub risk_factors: Vec<String>,
}

/// Reasons an intake is rejected before it reaches the rule engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("{field} must be between {min} and {max} characters (found {found})")]
    NameLength {
        field: PatientField,
        min: usize,
        max: usize,
        found: usize,
    },
    #[error("age must be between 0 and {max} (found {found})")]
    AgeOutOfRange { max: u32, found: u32 },
    #[error("{field} must be a finite, non-negative number (found {found})")]
    InvalidMeasurement { field: PatientField, found: f64 },
    #[error("HbA1c must not exceed {max}% (found {found})")]
    Hba1cOutOfRange { max: f64, found: f64 },
}

/// Limits mirrored from the intake form.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakePolicy {
    pub min_name_len: usize,
    pub max_name_len: usize,
    pub max_age: u32,
    pub max_hba1c: f64,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            min_name_len: 2,
            max_name_len: 50,
            max_age: 120,
            max_hba1c: 20.0,
        }
    }
}

/// Guard responsible for producing `PatientRecord` instances.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    pub fn validate(&self, intake: &PatientIntake) -> Result<(), IntakeViolation> {
        self.check_name(PatientField::FirstName, &intake.first_name)?;
        self.check_name(PatientField::LastName, &intake.last_name)?;

        if intake.age > self.policy.max_age {
            return Err(IntakeViolation::AgeOutOfRange {
                max: self.policy.max_age,
                found: intake.age,
            });
        }

        check_measurement(PatientField::FastingGlucose, intake.fasting_glucose)?;
        check_measurement(PatientField::Hba1c, intake.hba1c)?;
        if intake.hba1c > self.policy.max_hba1c {
            return Err(IntakeViolation::Hba1cOutOfRange {
                max: self.policy.max_hba1c,
                found: intake.hba1c,
            });
        }
        if let Some(random_glucose) = intake.random_glucose {
            check_measurement(PatientField::RandomGlucose, random_glucose)?;
        }
        check_measurement(PatientField::Bmi, intake.bmi)?;

        Ok(())
    }

    /// Validate an intake and fold in the derived symptom count.
    pub fn record_from_intake(
        &self,
        intake: PatientIntake,
        symptom_vocabulary: &[String],
    ) -> Result<PatientRecord, IntakeViolation> {
        self.validate(&intake)?;

        let symptom_count = count_symptoms(&intake.symptoms, symptom_vocabulary);

        Ok(PatientRecord {
            first_name: intake.first_name.trim().to_string(),
            last_name: intake.last_name.trim().to_string(),
            age: intake.age,
            symptoms: intake.symptoms,
            fasting_glucose: intake.fasting_glucose,
            hba1c: intake.hba1c,
            random_glucose: intake.random_glucose,
            pregnancy: intake.pregnancy,
            bmi: intake.bmi,
            risk_factors: intake.risk_factors,
            symptom_count,
        })
    }

    fn check_name(&self, field: PatientField, value: &str) -> Result<(), IntakeViolation> {
        let found = value.trim().chars().count();
        if found < self.policy.min_name_len || found > self.policy.max_name_len {
            return Err(IntakeViolation::NameLength {
                field,
                min: self.policy.min_name_len,
                max: self.policy.max_name_len,
                found,
            });
        }
        Ok(())
    }
}

fn check_measurement(field: PatientField, value: f64) -> Result<(), IntakeViolation> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(IntakeViolation::InvalidMeasurement {
            field,
            found: value,
        })
    }
}
