use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{HerbInput, Role};

// ---------------------------------------------------------------------------
// HerbRoleAssignment
// ---------------------------------------------------------------------------

/// The role given to one input herb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HerbRoleAssignment {
    pub name: String,
    /// Display form, e.g. "15g".
    pub dosage: String,
    pub role: Role,
    pub rationale: String,
    /// Heuristic certainty in [0, 1], not a calibrated probability.
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing: Option<String>,
    /// Whether the herb was found in the knowledge base.
    #[serde(default)]
    pub known: bool,
}

// ---------------------------------------------------------------------------
// RoleBuckets
// ---------------------------------------------------------------------------

/// Assignments partitioned by role, each bucket in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoleBuckets {
    #[serde(rename = "Monarch", default)]
    pub monarch: Vec<HerbRoleAssignment>,
    #[serde(rename = "Minister", default)]
    pub minister: Vec<HerbRoleAssignment>,
    #[serde(rename = "Assistant", default)]
    pub assistant: Vec<HerbRoleAssignment>,
    #[serde(rename = "Envoy", default)]
    pub envoy: Vec<HerbRoleAssignment>,
}

impl RoleBuckets {
    pub fn get(&self, role: Role) -> &[HerbRoleAssignment] {
        match role {
            Role::Monarch => &self.monarch,
            Role::Minister => &self.minister,
            Role::Assistant => &self.assistant,
            Role::Envoy => &self.envoy,
        }
    }

    pub fn push(&mut self, assignment: HerbRoleAssignment) {
        let bucket = match assignment.role {
            Role::Monarch => &mut self.monarch,
            Role::Minister => &mut self.minister,
            Role::Assistant => &mut self.assistant,
            Role::Envoy => &mut self.envoy,
        };
        bucket.push(assignment);
    }

    /// Buckets in role order (monarch first).
    pub fn iter(&self) -> impl Iterator<Item = (Role, &[HerbRoleAssignment])> {
        Role::ALL.iter().map(move |role| (*role, self.get(*role)))
    }

    pub fn assignments(&self) -> impl Iterator<Item = &HerbRoleAssignment> {
        self.iter().flat_map(|(_, bucket)| bucket.iter())
    }

    pub fn names(&self, role: Role) -> Vec<&str> {
        self.get(role).iter().map(|a| a.name.as_str()).collect()
    }

    pub fn total(&self) -> usize {
        self.iter().map(|(_, bucket)| bucket.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoleStats {
    pub count: usize,
    /// 0.0 for an empty bucket.
    pub mean_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositionAnalysis {
    pub total_herbs: usize,
    /// Sum of parsed dosages, regardless of unit.
    pub total_dosage: f64,
    pub unknown_herbs: usize,
    pub roles: BTreeMap<Role, RoleStats>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub composition_analysis: CompositionAnalysis,
    pub formula_characteristics: Vec<String>,
    pub compatibility_analysis: Vec<String>,
}

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub roles: RoleBuckets,
    pub summary: AnalysisSummary,
    /// Canonical name of the classical formula used, `None` when every herb
    /// was classified by the rule-based fallback.
    pub matched_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_ratio: Option<f64>,
}

impl AnalysisResult {
    pub fn assignment(&self, name: &str) -> Option<&HerbRoleAssignment> {
        self.roles.assignments().find(|a| a.name == name)
    }

    pub fn role_of(&self, name: &str) -> Option<Role> {
        self.assignment(name).map(|a| a.role)
    }
}

// ---------------------------------------------------------------------------
// Analyzer trait
// ---------------------------------------------------------------------------

/// Assigns monarch/minister/assistant/envoy roles to the herbs of a formula.
pub trait FormulaRoleAnalyzer: Send + Sync {
    /// Classify every input herb. Never fails: malformed dosages read as 0,
    /// unknown herbs fall back to dosage ranking, empty input gives an
    /// empty result.
    fn analyze(&self, herb_inputs: &[HerbInput]) -> AnalysisResult;
}
