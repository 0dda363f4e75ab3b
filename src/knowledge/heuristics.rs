use serde::{Deserialize, Serialize};

use crate::models::MatchPosition;

/// Describes what a herb probably does when the knowledge base has no record.
/// Affects rationale text only, never roles or confidence.
pub trait FunctionInference: Send + Sync {
    fn describe(&self, herb_name: &str) -> Option<String>;
}

/// Disables inference; unknown herbs get the generic "not recorded" text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInference;

impl FunctionInference for NoInference {
    fn describe(&self, _herb_name: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialCase {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameRule {
    pub pattern: String,
    pub position: MatchPosition,
    pub description: String,
}

impl NameRule {
    pub fn matches(&self, herb_name: &str) -> bool {
        self.position.matches(herb_name, &self.pattern)
    }
}

/// Name-based inference loaded from name_heuristics.json: exact special
/// cases first, then substring rules in file order, then the default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NameHeuristics {
    #[serde(default)]
    pub special_cases: Vec<SpecialCase>,
    #[serde(default)]
    pub rules: Vec<NameRule>,
    #[serde(default)]
    pub default_description: Option<String>,
}

impl FunctionInference for NameHeuristics {
    fn describe(&self, herb_name: &str) -> Option<String> {
        if let Some(case) = self.special_cases.iter().find(|c| c.name == herb_name) {
            return Some(case.description.clone());
        }
        if let Some(rule) = self.rules.iter().find(|r| r.matches(herb_name)) {
            return Some(rule.description.clone());
        }
        self.default_description
            .as_ref()
            .filter(|d| !d.is_empty())
            .cloned()
    }
}
