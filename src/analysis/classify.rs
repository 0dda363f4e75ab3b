use crate::config::AnalyzerConfig;
use crate::knowledge::{KnowledgeBase, PatternMatch};
use crate::models::{HerbInput, HerbRecord, Role};

use super::dosage::{display_dosage, parse_dosage};
use super::messages::RationaleTemplates;
use super::types::HerbRoleAssignment;

/// One input herb with its parsed dosage and knowledge-base record.
#[derive(Debug, Clone)]
pub struct ParsedHerb<'a> {
    /// Position in the caller's input list.
    pub index: usize,
    pub input: &'a HerbInput,
    /// Trimmed name used for every lookup.
    pub name: &'a str,
    pub dosage: f64,
    pub dosage_display: String,
    pub record: Option<&'a HerbRecord>,
}

impl<'a> ParsedHerb<'a> {
    pub fn parse(index: usize, input: &'a HerbInput, knowledge: &'a KnowledgeBase) -> Self {
        let dosage = parse_dosage(&input.dosage);
        Self {
            index,
            input,
            name: input.key(),
            dosage,
            dosage_display: display_dosage(input, dosage),
            record: knowledge.lookup(input.key()),
        }
    }

    pub fn is_known(&self) -> bool {
        self.record.is_some()
    }
}

/// Assigns exactly one role to every herb, in three passes:
/// classical pattern roles, fixed envoy roles, then dosage ranking.
pub struct RoleClassifier<'a> {
    knowledge: &'a KnowledgeBase,
    config: &'a AnalyzerConfig,
}

impl<'a> RoleClassifier<'a> {
    pub fn new(knowledge: &'a KnowledgeBase, config: &'a AnalyzerConfig) -> Self {
        Self { knowledge, config }
    }

    /// One assignment per herb, in input order.
    pub fn classify(
        &self,
        herbs: &[ParsedHerb<'_>],
        matched: Option<&PatternMatch<'_>>,
    ) -> Vec<HerbRoleAssignment> {
        let mut slots: Vec<Option<HerbRoleAssignment>> = vec![None; herbs.len()];

        if let Some(found) = matched {
            self.assign_pattern_roles(herbs, found, &mut slots);
        }
        self.assign_fixed_envoys(herbs, &mut slots);
        self.assign_ranked_roles(herbs, &mut slots);

        let assignments: Vec<HerbRoleAssignment> = slots.into_iter().flatten().collect();
        debug_assert_eq!(assignments.len(), herbs.len());
        assignments
    }

    /// Herbs in the matched formula's role structure take that role.
    /// Harmonizers are left for the envoy pass.
    fn assign_pattern_roles(
        &self,
        herbs: &[ParsedHerb<'_>],
        found: &PatternMatch<'_>,
        slots: &mut [Option<HerbRoleAssignment>],
    ) {
        for herb in herbs {
            if slots[herb.index].is_some() || self.is_harmonizer(herb) {
                continue;
            }
            let Some(role) = found.role_of(herb.name) else {
                continue;
            };
            let rationale = RationaleTemplates::pattern_role(
                &found.pattern.canonical_name,
                role,
                &self.knowledge.get_functions_summary(herb.name),
            );
            slots[herb.index] = Some(self.assign(
                herb,
                role,
                self.config.confidence.pattern,
                rationale,
            ));
        }
    }

    fn assign_fixed_envoys(&self, herbs: &[ParsedHerb<'_>], slots: &mut [Option<HerbRoleAssignment>]) {
        let confidence = &self.config.confidence;
        for herb in herbs {
            if slots[herb.index].is_some() {
                continue;
            }
            if self.is_harmonizer(herb) {
                slots[herb.index] = Some(self.assign(
                    herb,
                    Role::Envoy,
                    confidence.harmonizer,
                    RationaleTemplates::harmonizer(),
                ));
            } else if self.config.is_guiding_envoy(herb.name)
                && herb.dosage <= self.config.guiding_envoy_max_dosage
            {
                slots[herb.index] = Some(self.assign(
                    herb,
                    Role::Envoy,
                    confidence.guiding_envoy,
                    RationaleTemplates::guiding_envoy(),
                ));
            }
        }
    }

    /// Remaining herbs by dosage, highest first (ties keep input order).
    /// The first becomes monarch unless one exists; the next slots become
    /// ministers when heavy enough; the rest are assistants.
    fn assign_ranked_roles(&self, herbs: &[ParsedHerb<'_>], slots: &mut [Option<HerbRoleAssignment>]) {
        let mut remaining: Vec<&ParsedHerb<'_>> =
            herbs.iter().filter(|h| slots[h.index].is_none()).collect();
        remaining.sort_by(|a, b| b.dosage.total_cmp(&a.dosage));

        let has_monarch = slots
            .iter()
            .flatten()
            .any(|assignment| assignment.role == Role::Monarch);

        let mut ranked = remaining.into_iter();
        if !has_monarch {
            if let Some(first) = ranked.next() {
                slots[first.index] = Some(self.ranked(first, Role::Monarch));
            }
        }

        for (position, herb) in ranked.enumerate() {
            let role = if position < self.config.minister_slots
                && herb.dosage >= self.config.minister_min_dosage
            {
                Role::Minister
            } else {
                Role::Assistant
            };
            slots[herb.index] = Some(self.ranked(herb, role));
        }
    }

    fn ranked(&self, herb: &ParsedHerb<'_>, role: Role) -> HerbRoleAssignment {
        let confidence = &self.config.confidence;
        let (score, rationale) = match herb.record {
            Some(record) => (
                if role == Role::Monarch {
                    confidence.monarch
                } else {
                    confidence.ranked
                },
                RationaleTemplates::ranked(
                    role,
                    &herb.dosage_display,
                    &self.knowledge.get_functions_summary(herb.name),
                    record.most_likely_role().filter(|usual| *usual != role),
                ),
            ),
            None => (
                confidence.unknown_herb,
                RationaleTemplates::presumed(
                    role,
                    &herb.dosage_display,
                    &self.knowledge.infer_function(herb.name),
                ),
            ),
        };
        self.assign(herb, role, score, rationale)
    }

    /// Build an assignment, capping confidence for herbs the base does not know.
    fn assign(
        &self,
        herb: &ParsedHerb<'_>,
        role: Role,
        confidence: f64,
        rationale: String,
    ) -> HerbRoleAssignment {
        let confidence = if herb.is_known() {
            confidence
        } else {
            confidence.min(self.config.confidence.unknown_herb)
        };
        HerbRoleAssignment {
            name: herb.name.to_string(),
            dosage: herb.dosage_display.clone(),
            role,
            rationale,
            confidence,
            processing: herb.input.processing.clone(),
            known: herb.is_known(),
        }
    }

    fn is_harmonizer(&self, herb: &ParsedHerb<'_>) -> bool {
        self.knowledge
            .herbs
            .is_harmonizer(herb.name, &self.config.harmonizer_function)
    }
}
