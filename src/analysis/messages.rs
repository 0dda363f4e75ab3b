use crate::models::Role;

/// Rationale and summary sentences for role analysis.
/// Known herbs quote their recorded functions; herbs missing from the
/// knowledge base get hedged "presumed" wording.
pub struct RationaleTemplates;

impl RationaleTemplates {
    /// Role taken from a matched classical formula.
    pub fn pattern_role(formula: &str, role: Role, functions: &str) -> String {
        format!("classical formula {}'s {}; {}", formula, role.noun(), functions)
    }

    pub fn harmonizer() -> String {
        "harmonizes the formula, relieves urgency; a canonical envoy herb".to_string()
    }

    pub fn guiding_envoy() -> String {
        "guides the formula to its target channel, harmonizes defensive and \
         constructive qi; a canonical envoy herb"
            .to_string()
    }

    /// Role chosen by dosage ranking for a herb in the knowledge base.
    /// `usual` is the herb's most common role when it differs from `role`.
    pub fn ranked(role: Role, dosage: &str, functions: &str, usual: Option<Role>) -> String {
        let base = match role {
            Role::Monarch => format!(
                "highest dosage in the formula ({}); {}; targets the primary pathology",
                dosage, functions,
            ),
            Role::Minister => format!(
                "high-ranking dosage ({}); {}; reinforces the monarch herb",
                dosage, functions,
            ),
            Role::Assistant | Role::Envoy => format!(
                "{} at {}; addresses secondary symptoms or moderates stronger herbs",
                functions, dosage,
            ),
        };
        match usual {
            Some(usual) => format!("{}; usually serves as a {} herb", base, usual.noun()),
            None => base,
        }
    }

    /// Role chosen by dosage ranking for a herb the knowledge base lacks.
    pub fn presumed(role: Role, dosage: &str, inferred: &str) -> String {
        let position = match role {
            Role::Monarch => "the monarch herb",
            Role::Minister => "a minister herb",
            Role::Assistant => "an assistant herb",
            Role::Envoy => "an envoy herb",
        };
        format!(
            "presumed to be {} based on dosage ({}); not in the knowledge base, \
             likely {}",
            position, dosage, inferred,
        )
    }

    // -- formula characteristics --

    pub fn built_around(monarchs: &[&str]) -> String {
        format!(
            "formula is built around {} as monarch ({})",
            monarchs.join(", "),
            Role::Monarch.chinese_label(),
        )
    }

    pub fn no_monarch() -> String {
        "no monarch herb identified; every herb holds a supporting role".to_string()
    }

    pub fn reinforced_by(ministers: &[&str]) -> String {
        format!("{} reinforce the monarch as minister herbs", ministers.join(", "))
    }

    pub fn classical_basis(formula: &str, ratio: f64) -> String {
        format!(
            "composition follows the classical formula {} ({:.0}% of its herbs present)",
            formula,
            ratio * 100.0,
        )
    }

    pub fn rule_based() -> String {
        "no classical formula matched; roles inferred from dosage ranking and herb records"
            .to_string()
    }

    // -- compatibility analysis --

    pub fn thermal_balance(warming: usize, cooling: usize) -> String {
        if warming > cooling {
            format!(
                "overall nature leans warm ({} warming, {} cooling herbs)",
                warming, cooling,
            )
        } else if cooling > warming {
            format!(
                "overall nature leans cool ({} cooling, {} warming herbs)",
                cooling, warming,
            )
        } else if warming > 0 {
            format!("warming and cooling herbs are balanced ({} each)", warming)
        } else {
            "thermal nature is neutral or unrecorded".to_string()
        }
    }

    pub fn envoys_present(envoys: &[&str]) -> String {
        format!("{} harmonize the formula as envoy herbs", envoys.join(", "))
    }

    pub fn no_envoy() -> String {
        "no envoy herb present to harmonize the formula".to_string()
    }

    pub fn above_typical(herb: &str, dosage: &str, min: f64, max: f64) -> String {
        format!(
            "{} at {} exceeds its typical range of {}-{}g",
            herb, dosage, min, max,
        )
    }

    pub fn well_below_typical(herb: &str, dosage: &str, min: f64, max: f64) -> String {
        format!(
            "{} at {} is well below its typical range of {}-{}g",
            herb, dosage, min, max,
        )
    }

    pub fn unknown_herbs(herbs: &[&str]) -> String {
        format!(
            "{} herb(s) not in the knowledge base ({}); their roles are presumed from dosage",
            herbs.len(),
            herbs.join(", "),
        )
    }
}
