use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AnalyzerConfig;
use crate::knowledge::{KnowledgeBase, KnowledgeError};
use crate::models::HerbInput;

use super::classify::{ParsedHerb, RoleClassifier};
use super::summary::summarize;
use super::types::{AnalysisResult, FormulaRoleAnalyzer, RoleBuckets};

/// Default implementation of the role analyzer.
/// Runs pattern matching, fixed envoy roles and dosage ranking over a shared
/// knowledge base. Holds no per-call state.
#[derive(Debug, Clone)]
pub struct DefaultRoleAnalyzer {
    knowledge: Arc<KnowledgeBase>,
    config: AnalyzerConfig,
}

impl DefaultRoleAnalyzer {
    pub fn new(knowledge: Arc<KnowledgeBase>, config: AnalyzerConfig) -> Self {
        Self { knowledge, config }
    }

    /// Analyzer over the knowledge compiled into the binary, default thresholds.
    pub fn bundled() -> Result<Self, KnowledgeError> {
        Ok(Self::new(
            Arc::new(KnowledgeBase::bundled()?),
            AnalyzerConfig::default(),
        ))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

impl FormulaRoleAnalyzer for DefaultRoleAnalyzer {
    fn analyze(&self, herb_inputs: &[HerbInput]) -> AnalysisResult {
        let start = Instant::now();

        let herbs: Vec<ParsedHerb<'_>> = herb_inputs
            .iter()
            .enumerate()
            .map(|(index, input)| ParsedHerb::parse(index, input, &self.knowledge))
            .collect();

        let names: HashSet<&str> = herbs.iter().map(|h| h.name).collect();
        let matched = self
            .knowledge
            .patterns
            .find_best_match(&names, self.config.pattern_match_threshold);

        let mut roles = RoleBuckets::default();
        for assignment in RoleClassifier::new(&self.knowledge, &self.config)
            .classify(&herbs, matched.as_ref())
        {
            roles.push(assignment);
        }
        let summary = summarize(&roles, &herbs, matched.as_ref());

        tracing::info!(
            herbs = herbs.len(),
            unknown = summary.composition_analysis.unknown_herbs,
            matched_pattern = matched
                .as_ref()
                .map(|m| m.pattern.canonical_name.as_str())
                .unwrap_or("none"),
            processing_us = start.elapsed().as_micros() as u64,
            "Formula role analysis complete"
        );

        AnalysisResult {
            roles,
            summary,
            matched_pattern: matched.as_ref().map(|m| m.pattern.canonical_name.clone()),
            match_ratio: matched.as_ref().map(|m| m.ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use proptest::prelude::*;

    use super::*;
    use crate::analysis::dosage::parse_dosage;
    use crate::knowledge::NoInference;
    use crate::models::Role;

    static ANALYZER: LazyLock<DefaultRoleAnalyzer> =
        LazyLock::new(|| DefaultRoleAnalyzer::bundled().unwrap());

    fn herbs(list: &[(&str, f64)]) -> Vec<HerbInput> {
        list.iter().map(|(name, dosage)| HerbInput::new(*name, *dosage)).collect()
    }

    // -- example formulas --

    #[test]
    fn rule_based_four_herb_formula() {
        let result = ANALYZER.analyze(&herbs(&[
            ("黄芪", 15.0),
            ("白术", 12.0),
            ("茯苓", 10.0),
            ("甘草", 6.0),
        ]));

        assert!(result.matched_pattern.is_none());

        let licorice = result.assignment("甘草").unwrap();
        assert_eq!(licorice.role, Role::Envoy);
        assert_eq!(licorice.confidence, 0.95);

        let astragalus = result.assignment("黄芪").unwrap();
        assert_eq!(astragalus.role, Role::Monarch);
        assert_eq!(astragalus.confidence, 0.8);
        assert_eq!(astragalus.dosage, "15g");

        for name in ["白术", "茯苓"] {
            let herb = result.assignment(name).unwrap();
            assert_eq!(herb.role, Role::Minister, "{name}");
            assert_eq!(herb.confidence, 0.7, "{name}");
        }
        assert!(result.roles.assistant.is_empty());
    }

    #[test]
    fn four_gentlemen_follows_classical_roles() {
        let result = ANALYZER.analyze(&herbs(&[
            ("人参", 9.0),
            ("白术", 9.0),
            ("茯苓", 9.0),
            ("炙甘草", 6.0),
        ]));

        assert_eq!(result.matched_pattern.as_deref(), Some("四君子汤"));
        assert_eq!(result.match_ratio, Some(1.0));
        let expected = [
            ("人参", Role::Monarch),
            ("白术", Role::Minister),
            ("茯苓", Role::Assistant),
            ("炙甘草", Role::Envoy),
        ];
        for (name, role) in expected {
            let herb = result.assignment(name).unwrap();
            assert_eq!(herb.role, role, "{name}");
            assert_eq!(herb.confidence, 0.9, "{name}");
            assert!(herb.rationale.starts_with("classical formula 四君子汤's"), "{name}");
        }
        assert!(result.summary.formula_characteristics[2].contains("Four Gentlemen Decoction"));
    }

    #[test]
    fn single_unknown_herb_is_presumed_monarch() {
        let result = ANALYZER.analyze(&herbs(&[("某某藤", 5.0)]));
        let herb = result.assignment("某某藤").unwrap();
        assert_eq!(herb.role, Role::Monarch);
        assert_eq!(herb.confidence, 0.5);
        assert!(herb.rationale.contains("presumed"));
        assert!(!herb.known);
    }

    // -- threshold --

    #[test]
    fn three_of_five_matches_pattern() {
        let result = ANALYZER.analyze(&herbs(&[("酸枣仁", 15.0), ("知母", 9.0), ("川芎", 6.0)]));
        assert_eq!(result.matched_pattern.as_deref(), Some("酸枣仁汤"));
        assert_eq!(result.role_of("酸枣仁"), Some(Role::Monarch));
        assert_eq!(result.role_of("知母"), Some(Role::Minister));
        assert_eq!(result.role_of("川芎"), Some(Role::Assistant));
    }

    #[test]
    fn two_of_four_does_not_match() {
        let result = ANALYZER.analyze(&herbs(&[("人参", 9.0), ("白术", 12.0)]));
        assert!(result.matched_pattern.is_none());
        assert_eq!(result.role_of("白术"), Some(Role::Monarch));
        assert_eq!(result.role_of("人参"), Some(Role::Minister));
    }

    #[test]
    fn harmonizer_overrides_pattern_role() {
        // 酸枣仁汤 lists 甘草 as envoy; the harmonizer rule still applies.
        let result = ANALYZER.analyze(&herbs(&[
            ("酸枣仁", 15.0),
            ("茯苓", 9.0),
            ("知母", 9.0),
            ("川芎", 6.0),
            ("甘草", 3.0),
        ]));
        assert_eq!(result.match_ratio, Some(1.0));
        let licorice = result.assignment("甘草").unwrap();
        assert_eq!(licorice.role, Role::Envoy);
        assert_eq!(licorice.confidence, 0.95);
    }

    #[test]
    fn herbs_outside_pattern_fall_through() {
        let result = ANALYZER.analyze(&herbs(&[
            ("人参", 9.0),
            ("白术", 9.0),
            ("茯苓", 9.0),
            ("炙甘草", 6.0),
            ("陈皮", 6.0),
        ]));
        assert_eq!(result.matched_pattern.as_deref(), Some("四君子汤"));
        let peel = result.assignment("陈皮").unwrap();
        // Pattern already supplies the monarch, and 6g is too light for a minister.
        assert_eq!(peel.role, Role::Assistant);
        assert_eq!(peel.confidence, 0.7);
    }

    // -- edge cases --

    #[test]
    fn empty_input_gives_empty_result() {
        let result = ANALYZER.analyze(&[]);
        assert!(result.roles.is_empty());
        assert!(result.matched_pattern.is_none());
        assert_eq!(result.summary.composition_analysis.total_herbs, 0);
        assert!(result.summary.formula_characteristics.is_empty());
        assert!(result.summary.compatibility_analysis.is_empty());
    }

    #[test]
    fn text_dosages_are_parsed() {
        let inputs = vec![
            HerbInput::new("黄芪", "30g"),
            HerbInput::new("当归", "6 g"),
            HerbInput::new("生姜", "三片"),
        ];
        let result = ANALYZER.analyze(&inputs);
        assert_eq!(result.role_of("黄芪"), Some(Role::Monarch));
        let ginger = result.assignment("生姜").unwrap();
        assert_eq!(ginger.role, Role::Envoy);
        assert_eq!(ginger.dosage, "三片");
        assert_eq!(result.summary.composition_analysis.total_dosage, 36.0);
    }

    #[test]
    fn zero_dosage_sorts_last() {
        let result = ANALYZER.analyze(&herbs(&[("陈皮", 0.0), ("茯苓", 3.0)]));
        assert_eq!(result.role_of("茯苓"), Some(Role::Monarch));
        assert_eq!(result.role_of("陈皮"), Some(Role::Assistant));
    }

    #[test]
    fn empty_knowledge_is_purely_dosage_driven() {
        let analyzer = DefaultRoleAnalyzer::new(
            Arc::new(KnowledgeBase::empty().with_inference(Arc::new(NoInference))),
            AnalyzerConfig::default(),
        );
        let result = analyzer.analyze(&herbs(&[("甘草", 6.0), ("人参", 9.0)]));
        assert_eq!(result.role_of("人参"), Some(Role::Monarch));
        assert_eq!(result.role_of("甘草"), Some(Role::Assistant));
        assert!(result.roles.assignments().all(|a| a.confidence <= 0.5));
    }

    #[test]
    fn custom_config_changes_thresholds() {
        let config = AnalyzerConfig {
            minister_min_dosage: 12.0,
            ..AnalyzerConfig::default()
        };
        let analyzer = DefaultRoleAnalyzer::new(Arc::clone(&ANALYZER.knowledge), config);
        let result = analyzer.analyze(&herbs(&[("黄芪", 15.0), ("白术", 12.0), ("茯苓", 10.0)]));
        assert_eq!(result.role_of("白术"), Some(Role::Minister));
        assert_eq!(result.role_of("茯苓"), Some(Role::Assistant));
    }

    #[test]
    fn result_serializes_with_role_buckets() {
        let result = ANALYZER.analyze(&herbs(&[("黄芪", 15.0), ("甘草", 6.0)]));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["roles"]["Monarch"][0]["name"], "黄芪");
        assert_eq!(json["roles"]["Envoy"][0]["confidence"], 0.95);
        assert!(json["matched_pattern"].is_null());
        assert!(json["summary"]["composition_analysis"]["total_herbs"].is_number());
    }

    // -- properties --

    const POOL: &[&str] = &[
        "黄芪", "白术", "茯苓", "甘草", "人参", "炙甘草", "生姜", "大枣", "桂枝", "白芍",
        "当归", "川芎", "陈皮", "半夏", "某某藤", "刺五加参", "未知药",
    ];

    fn formula_strategy() -> impl Strategy<Value = Vec<HerbInput>> {
        proptest::collection::vec((0..POOL.len(), 0u32..40), 1..10).prop_map(|picks| {
            picks
                .into_iter()
                .map(|(i, dosage)| HerbInput::new(POOL[i], f64::from(dosage)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn every_herb_gets_exactly_one_role(inputs in formula_strategy()) {
            let result = ANALYZER.analyze(&inputs);
            prop_assert_eq!(result.roles.total(), inputs.len());
            let mut expected: Vec<&str> = inputs.iter().map(|h| h.name.as_str()).collect();
            let mut got: Vec<&str> = result.roles.assignments().map(|a| a.name.as_str()).collect();
            expected.sort_unstable();
            got.sort_unstable();
            prop_assert_eq!(expected, got);
        }

        #[test]
        fn analysis_is_deterministic(inputs in formula_strategy()) {
            prop_assert_eq!(ANALYZER.analyze(&inputs), ANALYZER.analyze(&inputs));
        }

        #[test]
        fn licorice_is_always_envoy(inputs in formula_strategy()) {
            let result = ANALYZER.analyze(&inputs);
            for assignment in result.roles.assignments().filter(|a| a.name == "甘草") {
                prop_assert_eq!(assignment.role, Role::Envoy);
                prop_assert_eq!(assignment.confidence, 0.95);
            }
        }

        #[test]
        fn unknown_herbs_never_exceed_ceiling(inputs in formula_strategy()) {
            let result = ANALYZER.analyze(&inputs);
            for assignment in result.roles.assignments().filter(|a| !a.known) {
                prop_assert!(assignment.confidence <= 0.5);
            }
        }

        #[test]
        fn heaviest_ranked_herb_is_monarch(inputs in formula_strategy()) {
            let result = ANALYZER.analyze(&inputs);
            prop_assume!(result.matched_pattern.is_none());

            let config = ANALYZER.config();
            let ranked: Vec<&HerbInput> = inputs
                .iter()
                .filter(|h| {
                    let name = h.key();
                    let dosage = parse_dosage(&h.dosage);
                    !ANALYZER.knowledge().herbs.is_harmonizer(name, &config.harmonizer_function)
                        && !(config.is_guiding_envoy(name) && dosage <= config.guiding_envoy_max_dosage)
                })
                .collect();
            prop_assume!(!ranked.is_empty());

            let mut heaviest = ranked[0];
            for herb in ranked.iter().skip(1).copied() {
                if parse_dosage(&herb.dosage) > parse_dosage(&heaviest.dosage) {
                    heaviest = herb;
                }
            }
            let monarchs = &result.roles.monarch;
            prop_assert_eq!(monarchs.len(), 1);
            prop_assert_eq!(monarchs[0].name.as_str(), heaviest.key());
        }
    }
}
