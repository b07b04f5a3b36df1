use tracing::debug;

use super::condition::{evaluate, evaluate_entry};
use super::EvaluationMode;
use crate::screening::domain::{FieldSource, FieldValue, RuleMatch, SingleField};
use crate::screening::knowledge::{Rule, RuleBody};

pub(crate) const UNKNOWN_ACTION: &str = "Unknown action";

/// Applies every rule in declaration order and collects the matches.
///
/// Compound rules contribute one match per satisfied field test, each carrying
/// the action of the group that declared it.
pub fn apply_rules<S>(source: &S, rules: &[Rule], mode: EvaluationMode) -> Vec<RuleMatch>
where
    S: FieldSource + ?Sized,
{
    let mut matches = Vec::new();

    for rule in rules {
        let before = matches.len();

        match &rule.body {
            RuleBody::Single { condition, action } => {
                if evaluate(source, condition, mode) {
                    matches.push(rule_match(rule, action.as_deref()));
                }
            }
            RuleBody::Compound(groups) => {
                for group in groups {
                    for test in &group.tests {
                        let value = source
                            .field(test.field)
                            .unwrap_or(FieldValue::Number(0.0));
                        let view = SingleField::new(test.field, value);
                        if evaluate_entry(&view, test) {
                            matches.push(rule_match(rule, group.action.as_deref()));
                        }
                    }
                }
            }
        }

        debug!(
            rule_id = %rule.id,
            matched = matches.len() - before,
            "rule checked"
        );
    }

    matches
}

fn rule_match(rule: &Rule, action: Option<&str>) -> RuleMatch {
    RuleMatch {
        rule_id: rule.id.clone(),
        description: rule.description.clone(),
        action: action.unwrap_or(UNKNOWN_ACTION).to_string(),
    }
}
