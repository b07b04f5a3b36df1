//! Diagnostic knowledge base: ordered rules plus the canonical vocabularies.
//!
//! Documents are parsed once into typed rules so that evaluation never
//! re-reads threshold strings.

mod comparison;
mod document;

pub use comparison::{Comparison, Condition, ConditionEntry, ExactValue};

use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::screening::domain::PatientField;
use document::KnowledgeDocument;

const STANDARD_KNOWLEDGE_BASE: &str = include_str!("../../../data/knowledge_base.json");

/// Failures raised while loading a knowledge-base document.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid knowledge base document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("rule {rule_id} declares neither `condition` nor `conditions`")]
    MissingCondition { rule_id: String },
    #[error("rule {rule_id} declares both `condition` and `conditions`")]
    AmbiguousRule { rule_id: String },
    #[error("rule {rule_id} references unknown patient field `{key}`")]
    UnknownField { rule_id: String, key: String },
    #[error("rule {rule_id} has an unsupported value for `{field}`: {detail}")]
    UnsupportedValue {
        rule_id: String,
        field: PatientField,
        detail: String,
    },
    #[error("rule {rule_id} has an unreadable threshold for `{field}`: {value:?}")]
    InvalidThreshold {
        rule_id: String,
        field: PatientField,
        value: String,
    },
}

/// Diagnostic rule in one of its two authored forms.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: String,
    pub description: String,
    pub body: RuleBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleBody {
    /// One condition; the rule's own action is reported on a match.
    Single {
        condition: Condition,
        action: Option<String>,
    },
    /// Independent field tests, each group carrying its own action.
    Compound(Vec<CompoundCondition>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundCondition {
    pub tests: Vec<ConditionEntry>,
    pub action: Option<String>,
}

/// Immutable rule set and vocabularies, loaded once and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    rules: Vec<Rule>,
    symptoms: Vec<String>,
    risk_factors: Vec<String>,
}

impl KnowledgeBase {
    pub fn new(rules: Vec<Rule>, symptoms: Vec<String>, risk_factors: Vec<String>) -> Self {
        Self {
            rules,
            symptoms,
            risk_factors,
        }
    }

    /// The knowledge base bundled with the binary.
    pub fn standard() -> Result<Self, KnowledgeBaseError> {
        Self::from_json_str(STANDARD_KNOWLEDGE_BASE)
    }

    /// Loads from `path` when given, otherwise falls back to the bundled rules.
    pub fn load(path: Option<&Path>) -> Result<Self, KnowledgeBaseError> {
        let (knowledge, source) = match path {
            Some(path) => (Self::from_path(path)?, path.display().to_string()),
            None => (Self::standard()?, "bundled".to_string()),
        };
        info!(
            rules = knowledge.rules.len(),
            symptoms = knowledge.symptoms.len(),
            risk_factors = knowledge.risk_factors.len(),
            %source,
            "knowledge base loaded"
        );
        Ok(knowledge)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeBaseError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, KnowledgeBaseError> {
        let document: KnowledgeDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, KnowledgeBaseError> {
        let document: KnowledgeDocument = serde_json::from_str(raw)?;
        Self::from_document(document)
    }

    fn from_document(document: KnowledgeDocument) -> Result<Self, KnowledgeBaseError> {
        let rules = document
            .rules
            .into_iter()
            .map(|rule| rule.into_rule())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            symptoms: document.facts.symptoms,
            risk_factors: document.facts.risk_factors.flatten(),
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Canonical symptom vocabulary in document order.
    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    /// Demographic, lifestyle, then medical risk factors.
    pub fn risk_factors(&self) -> &[String] {
        &self.risk_factors
    }

    pub fn search_symptoms(&self, query: &str) -> Vec<&str> {
        search(&self.symptoms, query)
    }

    pub fn search_risk_factors(&self, query: &str) -> Vec<&str> {
        search(&self.risk_factors, query)
    }
}

fn search<'a>(vocabulary: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    vocabulary
        .iter()
        .filter(|entry| entry.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}
