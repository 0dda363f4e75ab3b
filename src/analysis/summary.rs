use std::collections::BTreeMap;

use crate::knowledge::PatternMatch;
use crate::models::{DosageRangeStatus, Role};

use super::classify::ParsedHerb;
use super::messages::RationaleTemplates;
use super::types::{AnalysisSummary, CompositionAnalysis, RoleBuckets, RoleStats};

/// Aggregate classified roles into counts, characteristics and
/// compatibility notes. Empty input yields zero counts and empty lists.
pub fn summarize(
    roles: &RoleBuckets,
    herbs: &[ParsedHerb<'_>],
    matched: Option<&PatternMatch<'_>>,
) -> AnalysisSummary {
    let composition_analysis = composition(roles, herbs);
    if herbs.is_empty() {
        return AnalysisSummary {
            composition_analysis,
            ..AnalysisSummary::default()
        };
    }

    AnalysisSummary {
        composition_analysis,
        formula_characteristics: characteristics(roles, matched),
        compatibility_analysis: compatibility(roles, herbs),
    }
}

fn composition(roles: &RoleBuckets, herbs: &[ParsedHerb<'_>]) -> CompositionAnalysis {
    let per_role: BTreeMap<Role, RoleStats> = roles
        .iter()
        .map(|(role, bucket)| {
            let mean_confidence = if bucket.is_empty() {
                0.0
            } else {
                bucket.iter().map(|a| a.confidence).sum::<f64>() / bucket.len() as f64
            };
            (
                role,
                RoleStats {
                    count: bucket.len(),
                    mean_confidence,
                },
            )
        })
        .collect();

    CompositionAnalysis {
        total_herbs: herbs.len(),
        total_dosage: herbs.iter().map(|h| h.dosage).sum(),
        unknown_herbs: herbs.iter().filter(|h| !h.is_known()).count(),
        roles: per_role,
    }
}

/// One to three sentences: the monarch, its ministers, the formula basis.
fn characteristics(roles: &RoleBuckets, matched: Option<&PatternMatch<'_>>) -> Vec<String> {
    let mut lines = Vec::with_capacity(3);

    let monarchs = roles.names(Role::Monarch);
    if monarchs.is_empty() {
        lines.push(RationaleTemplates::no_monarch());
    } else {
        lines.push(RationaleTemplates::built_around(&monarchs));
    }

    let ministers = roles.names(Role::Minister);
    if !ministers.is_empty() {
        lines.push(RationaleTemplates::reinforced_by(&ministers));
    }

    lines.push(match matched {
        Some(found) => RationaleTemplates::classical_basis(&found.pattern.display_name(), found.ratio),
        None => RationaleTemplates::rule_based(),
    });
    lines
}

fn compatibility(roles: &RoleBuckets, herbs: &[ParsedHerb<'_>]) -> Vec<String> {
    let mut lines = Vec::new();

    let natures: Vec<_> = herbs
        .iter()
        .filter_map(|h| h.record.map(|r| r.thermal_nature()))
        .collect();
    let warming = natures.iter().filter(|n| n.is_warming()).count();
    let cooling = natures.iter().filter(|n| n.is_cooling()).count();
    lines.push(RationaleTemplates::thermal_balance(warming, cooling));

    let envoys = roles.names(Role::Envoy);
    if envoys.is_empty() {
        lines.push(RationaleTemplates::no_envoy());
    } else {
        lines.push(RationaleTemplates::envoys_present(&envoys));
    }

    for herb in herbs {
        let Some(record) = herb.record else {
            continue;
        };
        let (min, max) = record.typical_dosage_range;
        match record.dosage_status(herb.dosage) {
            DosageRangeStatus::AboveTypical => lines.push(RationaleTemplates::above_typical(
                herb.name,
                &herb.dosage_display,
                min,
                max,
            )),
            DosageRangeStatus::WellBelowTypical => lines.push(
                RationaleTemplates::well_below_typical(herb.name, &herb.dosage_display, min, max),
            ),
            DosageRangeStatus::Typical | DosageRangeStatus::Unspecified => {}
        }
    }

    let unknown: Vec<&str> = herbs.iter().filter(|h| !h.is_known()).map(|h| h.name).collect();
    if !unknown.is_empty() {
        lines.push(RationaleTemplates::unknown_herbs(&unknown));
    }

    lines
}
