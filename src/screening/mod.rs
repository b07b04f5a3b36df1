//! Diabetes screening: knowledge base, rule evaluation, and the intake and
//! export collaborators around it.

pub mod batch;
pub mod domain;
pub mod evaluation;
pub mod intake;
pub mod knowledge;
pub mod report;

#[cfg(test)]
mod tests;

pub use batch::{BatchImportError, BatchImporter};
pub use domain::{
    FieldSource, FieldValue, PatientField, PatientName, PatientRecord, Pregnancy, RuleMatch,
    SingleField,
};
pub use evaluation::{
    apply_rules, count_symptoms, evaluate, summarize, Analysis, DiagnosticEngine, EvaluationMode,
    Recommendation,
};
pub use intake::{IntakeGuard, IntakePolicy, IntakeViolation, PatientIntake};
pub use knowledge::{KnowledgeBase, KnowledgeBaseError, Rule, RuleBody};
pub use report::AnalysisReport;
