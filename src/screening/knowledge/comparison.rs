use serde_json::Value;

use super::KnowledgeBaseError;
use crate::screening::domain::PatientField;

const AT_LEAST: char = '≥';
const LESS_THAN: char = '<';
const RANGE_SEPARATOR: char = '–';

/// Pre-parsed comparison attached to one condition field.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    AtLeast(f64),
    LessThan(f64),
    /// Inclusive on both ends.
    Range { low: f64, high: f64 },
    /// Symptom list must contain this exact entry.
    Includes(String),
    Equals(ExactValue),
    /// List value must contain every element.
    ContainsAll(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExactValue {
    Number(f64),
    Text(String),
}

/// A single `field -> comparison` test.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionEntry {
    pub field: PatientField,
    pub comparison: Comparison,
}

/// Ordered set of field tests. An empty condition never matches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Condition {
    entries: Vec<ConditionEntry>,
}

impl Condition {
    pub fn new(entries: Vec<ConditionEntry>) -> Self {
        Self { entries }
    }

    pub fn single(field: PatientField, comparison: Comparison) -> Self {
        Self::new(vec![ConditionEntry { field, comparison }])
    }

    pub fn entries(&self) -> &[ConditionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn parse_entry(
    rule_id: &str,
    key: &str,
    value: &Value,
) -> Result<ConditionEntry, KnowledgeBaseError> {
    let field = PatientField::from_key(key).ok_or_else(|| KnowledgeBaseError::UnknownField {
        rule_id: rule_id.to_string(),
        key: key.to_string(),
    })?;
    let comparison = parse_comparison(rule_id, field, value)?;
    Ok(ConditionEntry { field, comparison })
}

pub(crate) fn parse_comparison(
    rule_id: &str,
    field: PatientField,
    value: &Value,
) -> Result<Comparison, KnowledgeBaseError> {
    match value {
        Value::String(raw) => match parse_threshold(raw) {
            Some(Some(comparison)) => Ok(comparison),
            Some(None) => Err(KnowledgeBaseError::InvalidThreshold {
                rule_id: rule_id.to_string(),
                field,
                value: raw.clone(),
            }),
            None if field == PatientField::Symptoms => Ok(Comparison::Includes(raw.clone())),
            None => Ok(Comparison::Equals(ExactValue::Text(raw.clone()))),
        },
        Value::Number(number) => number
            .as_f64()
            .map(|value| Comparison::Equals(ExactValue::Number(value)))
            .ok_or_else(|| unsupported(rule_id, field, "number out of range")),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| unsupported(rule_id, field, "list elements must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Comparison::ContainsAll),
        Value::Null => Err(unsupported(rule_id, field, "null")),
        Value::Bool(_) => Err(unsupported(rule_id, field, "boolean")),
        Value::Object(_) => Err(unsupported(rule_id, field, "nested object")),
    }
}

/// Removes a trailing `" (note)"` annotation from compound condition values.
pub(crate) fn strip_annotation(raw: &str) -> &str {
    raw.split(" (").next().unwrap_or(raw)
}

fn unsupported(rule_id: &str, field: PatientField, detail: &str) -> KnowledgeBaseError {
    KnowledgeBaseError::UnsupportedValue {
        rule_id: rule_id.to_string(),
        field,
        detail: detail.to_string(),
    }
}

/// `None` when the text is not a threshold expression at all, `Some(None)`
/// when it is one but its numbers cannot be read.
fn parse_threshold(raw: &str) -> Option<Option<Comparison>> {
    let cleaned = raw.replacen('%', "", 1).replacen("mg/dL", "", 1);
    let cleaned = cleaned.trim();

    if let Some(rest) = cleaned.strip_prefix(AT_LEAST) {
        Some(leading_number(rest).map(Comparison::AtLeast))
    } else if cleaned.contains(RANGE_SEPARATOR) {
        let mut bounds = cleaned.split(RANGE_SEPARATOR).map(leading_number);
        let low = bounds.next().flatten();
        let high = bounds.next().flatten();
        Some(low.zip(high).map(|(low, high)| Comparison::Range { low, high }))
    } else if let Some(rest) = cleaned.strip_prefix(LESS_THAN) {
        Some(leading_number(rest).map(Comparison::LessThan))
    } else {
        None
    }
}

/// Reads the longest numeric prefix, ignoring leading whitespace.
fn leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let candidate_len = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .count();

    (1..=candidate_len)
        .rev()
        .find_map(|len| trimmed[..len].parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
