mod condition;
mod matcher;
mod policy;
mod symptoms;

pub use condition::{evaluate, evaluate_entry};
pub use matcher::apply_rules;
pub use policy::{summarize, Recommendation};
pub use symptoms::count_symptoms;

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{PatientRecord, RuleMatch};
use super::intake::{IntakeGuard, IntakeViolation, PatientIntake};
use super::knowledge::KnowledgeBase;

/// How multi-field single conditions are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationMode {
    /// Only the first declared field decides; matches the legacy rule semantics.
    #[default]
    FirstEntry,
    /// Every declared field must hold.
    AllEntries,
}

impl EvaluationMode {
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationMode::FirstEntry => "first-entry",
            EvaluationMode::AllEntries => "all-entries",
        }
    }
}

impl FromStr for EvaluationMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first-entry" | "first" | "legacy" => Ok(EvaluationMode::FirstEntry),
            "all-entries" | "all" | "conjunctive" => Ok(EvaluationMode::AllEntries),
            other => Err(format!(
                "unknown condition mode '{other}' (expected first-entry or all-entries)"
            )),
        }
    }
}

/// Stateless engine that runs the knowledge base against patient records.
#[derive(Debug, Clone)]
pub struct DiagnosticEngine {
    knowledge: Arc<KnowledgeBase>,
    mode: EvaluationMode,
    guard: IntakeGuard,
}

impl DiagnosticEngine {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            knowledge,
            mode: EvaluationMode::default(),
            guard: IntakeGuard::default(),
        }
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_guard(mut self, guard: IntakeGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Validates raw intake, assembles the record, and evaluates it.
    pub fn analyze(&self, intake: PatientIntake) -> Result<Analysis, IntakeViolation> {
        let patient = self
            .guard
            .record_from_intake(intake, self.knowledge.symptoms())?;
        Ok(self.analyze_record(patient))
    }

    /// Evaluates an already assembled record.
    pub fn analyze_record(&self, patient: PatientRecord) -> Analysis {
        let matches = apply_rules(&patient, self.knowledge.rules(), self.mode);
        let recommendation = summarize(&matches);

        info!(
            matches = matches.len(),
            ?recommendation,
            mode = self.mode.label(),
            "patient analysed"
        );

        Analysis {
            patient,
            matches,
            recommendation,
        }
    }
}

/// Outcome of one analysis: the evaluated record, ordered matches, and advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub patient: PatientRecord,
    pub matches: Vec<RuleMatch>,
    pub recommendation: Recommendation,
}

impl Analysis {
    pub fn message(&self) -> &'static str {
        self.recommendation.message()
    }
}
