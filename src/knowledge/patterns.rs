use std::collections::{BTreeSet, HashSet};

use crate::models::{FormulaPattern, Role};

use super::KnowledgeError;

/// Absorbs float error so that exactly 3 of 5 herbs counts as 60%.
const RATIO_TOLERANCE: f64 = 1e-9;

/// A formula pattern that cleared the match threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternMatch<'a> {
    pub pattern: &'a FormulaPattern,
    /// |input ∩ composition| / |composition|
    pub ratio: f64,
    pub matched: usize,
}

impl PatternMatch<'_> {
    pub fn role_of(&self, herb: &str) -> Option<Role> {
        self.pattern.role_of(herb)
    }
}

/// Classical formulas in library order (file order).
#[derive(Debug, Clone, Default)]
pub struct FormulaPatternLibrary {
    patterns: Vec<FormulaPattern>,
}

impl FormulaPatternLibrary {
    /// Validate and index patterns. Every herb named in a role structure must
    /// be part of the composition, and may hold only one role.
    pub fn from_patterns(patterns: Vec<FormulaPattern>) -> Result<Self, KnowledgeError> {
        let mut seen_names = HashSet::new();
        for pattern in &patterns {
            if !seen_names.insert(pattern.canonical_name.as_str()) {
                return Err(KnowledgeError::DuplicatePattern(
                    pattern.canonical_name.clone(),
                ));
            }
            validate_pattern(pattern)?;
        }
        Ok(Self { patterns })
    }

    pub fn get(&self, canonical_name: &str) -> Option<&FormulaPattern> {
        self.patterns
            .iter()
            .find(|p| p.canonical_name == canonical_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormulaPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Share of the pattern's composition present in `herb_names`.
    pub fn match_ratio(pattern: &FormulaPattern, herb_names: &HashSet<&str>) -> (f64, usize) {
        let composition: BTreeSet<&str> = pattern.composition.iter().map(String::as_str).collect();
        if composition.is_empty() {
            return (0.0, 0);
        }
        let matched = composition
            .iter()
            .filter(|herb| herb_names.contains(*herb))
            .count();
        (matched as f64 / composition.len() as f64, matched)
    }

    /// Pattern with the highest match ratio, if that ratio reaches `threshold`.
    /// Equal ratios keep the earliest pattern in library order.
    pub fn find_best_match(
        &self,
        herb_names: &HashSet<&str>,
        threshold: f64,
    ) -> Option<PatternMatch<'_>> {
        let mut best: Option<PatternMatch<'_>> = None;

        for pattern in &self.patterns {
            let (ratio, matched) = Self::match_ratio(pattern, herb_names);
            if matched == 0 {
                continue;
            }
            let better = match &best {
                Some(current) => ratio > current.ratio + RATIO_TOLERANCE,
                None => true,
            };
            if better {
                best = Some(PatternMatch {
                    pattern,
                    ratio,
                    matched,
                });
            }
        }

        match best {
            Some(found) if found.ratio + RATIO_TOLERANCE >= threshold => {
                tracing::debug!(
                    pattern = %found.pattern.canonical_name,
                    ratio = found.ratio,
                    matched = found.matched,
                    "Formula pattern matched"
                );
                Some(found)
            }
            Some(found) => {
                tracing::debug!(
                    pattern = %found.pattern.canonical_name,
                    ratio = found.ratio,
                    threshold,
                    "Best formula pattern below threshold"
                );
                None
            }
            None => None,
        }
    }
}

fn validate_pattern(pattern: &FormulaPattern) -> Result<(), KnowledgeError> {
    let mut assigned = HashSet::new();
    for herbs in pattern.role_structure.values() {
        for herb in herbs {
            if !pattern.contains(herb) {
                return Err(KnowledgeError::InvalidPattern {
                    pattern: pattern.canonical_name.clone(),
                    herb: herb.clone(),
                });
            }
            if !assigned.insert(herb.as_str()) {
                return Err(KnowledgeError::DuplicateRole {
                    pattern: pattern.canonical_name.clone(),
                    herb: herb.clone(),
                });
            }
        }
    }
    Ok(())
}
