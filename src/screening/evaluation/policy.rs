use serde::{Deserialize, Serialize};

use crate::screening::domain::RuleMatch;

const DIABETES_MARKER: &str = "Diabetes diagnosis";
const PREDIABETES_MARKER: &str = "Prediabetes diagnosis";
const EMERGENCY_MARKER: &str = "Emergency";
const URGENT_MARKER: &str = "urgent";

/// Consolidated advice derived from all matched rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    DiabetesLikely,
    Prediabetes,
    Emergency,
    Monitor,
}

impl Recommendation {
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::DiabetesLikely => {
                "Likely type 2 diabetes. Consult a physician for confirmation and treatment."
            }
            Recommendation::Prediabetes => {
                "Prediabetes detected. Consider lifestyle changes and follow-up testing."
            }
            Recommendation::Emergency => {
                "Emergency condition detected. Seek immediate medical attention."
            }
            Recommendation::Monitor => {
                "Insufficient evidence of diabetes. Keep monitoring symptoms and risk factors."
            }
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Reduces matches to the single highest-priority recommendation.
///
/// Diagnosis outranks prediabetes, which outranks emergency markers; anything
/// else (including no matches) falls back to monitoring.
pub fn summarize(matches: &[RuleMatch]) -> Recommendation {
    if any_action(matches, |action| action.contains(DIABETES_MARKER)) {
        Recommendation::DiabetesLikely
    } else if any_action(matches, |action| action.contains(PREDIABETES_MARKER)) {
        Recommendation::Prediabetes
    } else if any_action(matches, |action| {
        action.contains(EMERGENCY_MARKER) || action.to_lowercase().contains(URGENT_MARKER)
    }) {
        Recommendation::Emergency
    } else {
        Recommendation::Monitor
    }
}

fn any_action(matches: &[RuleMatch], predicate: impl Fn(&str) -> bool) -> bool {
    matches.iter().any(|found| predicate(&found.action))
}
