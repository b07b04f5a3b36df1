use tracing::trace;

use super::EvaluationMode;
use crate::screening::domain::{FieldSource, FieldValue};
use crate::screening::knowledge::{Comparison, Condition, ConditionEntry, ExactValue};

/// Decides whether `condition` holds for the patient data in `source`.
///
/// Under [`EvaluationMode::FirstEntry`] only the first declared entry is
/// consulted; [`EvaluationMode::AllEntries`] requires every entry to hold.
/// Empty conditions never match.
pub fn evaluate<S>(source: &S, condition: &Condition, mode: EvaluationMode) -> bool
where
    S: FieldSource + ?Sized,
{
    let Some(first) = condition.entries().first() else {
        trace!("empty condition never matches");
        return false;
    };

    match mode {
        EvaluationMode::FirstEntry => evaluate_entry(source, first),
        EvaluationMode::AllEntries => condition
            .entries()
            .iter()
            .all(|entry| evaluate_entry(source, entry)),
    }
}

/// Tests a single field. A field missing from `source` fails the test.
pub fn evaluate_entry<S>(source: &S, entry: &ConditionEntry) -> bool
where
    S: FieldSource + ?Sized,
{
    let Some(value) = source.field(entry.field) else {
        trace!(field = %entry.field, "field missing from patient data");
        return false;
    };

    let satisfied = compare(value, &entry.comparison);
    trace!(
        field = %entry.field,
        %value,
        comparison = ?entry.comparison,
        satisfied,
        "condition entry evaluated"
    );
    satisfied
}

fn compare(value: FieldValue<'_>, comparison: &Comparison) -> bool {
    match (comparison, value) {
        (Comparison::AtLeast(threshold), FieldValue::Number(actual)) => actual >= *threshold,
        (Comparison::LessThan(threshold), FieldValue::Number(actual)) => actual < *threshold,
        (Comparison::Range { low, high }, FieldValue::Number(actual)) => {
            actual >= *low && actual <= *high
        }
        (Comparison::Includes(expected), FieldValue::List(items)) => {
            items.iter().any(|item| item == expected)
        }
        (Comparison::ContainsAll(required), FieldValue::List(items)) => {
            required.iter().all(|needed| items.contains(needed))
        }
        (Comparison::Equals(ExactValue::Number(expected)), FieldValue::Number(actual)) => {
            actual == *expected
        }
        (Comparison::Equals(ExactValue::Text(expected)), FieldValue::Text(actual)) => {
            actual == expected
        }
        _ => false,
    }
}
