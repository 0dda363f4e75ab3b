use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::Role;

/// A classical formula with its conventional role assignment (loaded from formulas.json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaPattern {
    pub canonical_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_name: Option<String>,
    /// Herbs defining the formula; treated as a set.
    pub composition: Vec<String>,
    pub role_structure: BTreeMap<Role, Vec<String>>,
}

impl FormulaPattern {
    pub fn contains(&self, herb: &str) -> bool {
        self.composition.iter().any(|h| h == herb)
    }

    /// Role the classical formula assigns to `herb`, if any.
    pub fn role_of(&self, herb: &str) -> Option<Role> {
        self.role_structure
            .iter()
            .find(|(_, herbs)| herbs.iter().any(|h| h == herb))
            .map(|(role, _)| *role)
    }

    /// Display name, e.g. "四君子汤 (Four Gentlemen Decoction)".
    pub fn display_name(&self) -> String {
        match &self.english_name {
            Some(english) => format!("{} ({})", self.canonical_name, english),
            None => self.canonical_name.clone(),
        }
    }
}
