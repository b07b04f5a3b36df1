use serde::Deserialize;
use serde_json::{Map, Value};

use super::comparison::{
    parse_comparison, parse_entry, strip_annotation, Condition, ConditionEntry,
};
use super::{CompoundCondition, KnowledgeBaseError, Rule, RuleBody};
use crate::screening::domain::PatientField;

pub(crate) const ACTION_KEY: &str = "action";

/// Serialized knowledge base as authored by clinicians.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KnowledgeDocument {
    pub(crate) rules: Vec<RuleDocument>,
    pub(crate) facts: FactsDocument,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RuleDocument {
    id: String,
    description: String,
    #[serde(default)]
    condition: Option<Map<String, Value>>,
    #[serde(default)]
    conditions: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    action: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FactsDocument {
    pub(crate) symptoms: Vec<String>,
    pub(crate) risk_factors: RiskFactorsDocument,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RiskFactorsDocument {
    #[serde(default)]
    demographic: Vec<String>,
    #[serde(default)]
    lifestyle: Vec<String>,
    #[serde(default)]
    medical: Vec<String>,
}

impl RiskFactorsDocument {
    pub(crate) fn flatten(self) -> Vec<String> {
        let mut all = self.demographic;
        all.extend(self.lifestyle);
        all.extend(self.medical);
        all
    }
}

impl RuleDocument {
    pub(crate) fn into_rule(self) -> Result<Rule, KnowledgeBaseError> {
        let RuleDocument {
            id,
            description,
            condition,
            conditions,
            action,
        } = self;

        let body = match (condition, conditions) {
            (Some(condition), None) => RuleBody::Single {
                condition: single_condition(&id, &condition)?,
                action,
            },
            (None, Some(conditions)) => RuleBody::Compound(
                conditions
                    .iter()
                    .map(|entry| compound_condition(&id, entry))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            (Some(_), Some(_)) => return Err(KnowledgeBaseError::AmbiguousRule { rule_id: id }),
            (None, None) => return Err(KnowledgeBaseError::MissingCondition { rule_id: id }),
        };

        Ok(Rule {
            id,
            description,
            body,
        })
    }
}

fn single_condition(
    rule_id: &str,
    condition: &Map<String, Value>,
) -> Result<Condition, KnowledgeBaseError> {
    condition
        .iter()
        .map(|(key, value)| parse_entry(rule_id, key, value))
        .collect::<Result<Vec<_>, _>>()
        .map(Condition::new)
}

fn compound_condition(
    rule_id: &str,
    entry: &Map<String, Value>,
) -> Result<CompoundCondition, KnowledgeBaseError> {
    let action = entry
        .get(ACTION_KEY)
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut tests = Vec::new();
    for (key, value) in entry.iter().filter(|(key, _)| key.as_str() != ACTION_KEY) {
        let field =
            PatientField::from_key(key).ok_or_else(|| KnowledgeBaseError::UnknownField {
                rule_id: rule_id.to_string(),
                key: key.clone(),
            })?;
        let value = match value {
            Value::String(raw) => Value::String(strip_annotation(raw).to_string()),
            other => other.clone(),
        };
        let comparison = parse_comparison(rule_id, field, &value)?;
        tests.push(ConditionEntry { field, comparison });
    }

    Ok(CompoundCondition { tests, action })
}
