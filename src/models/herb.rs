use serde::{Deserialize, Serialize};

use super::enums::{Role, ThermalNature};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HerbProperties {
    /// e.g. "bitter, cold"
    pub taste_temperature: String,
    /// e.g. "heart, liver"
    pub meridian_affinity: String,
}

/// One entry of the herb knowledge base (loaded from herbs.json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HerbRecord {
    pub name: String,
    pub properties: HerbProperties,
    /// Therapeutic effects, most characteristic first.
    pub functions: Vec<String>,
    /// Roles this herb commonly plays, most likely first.
    pub typical_roles: Vec<Role>,
    /// (min, max) in grams. Reference only, never enforced.
    pub typical_dosage_range: (f64, f64),
    pub category: String,
}

/// Where a dosage sits relative to the typical range of a herb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DosageRangeStatus {
    Typical,
    AboveTypical,
    /// Less than half of the typical minimum.
    WellBelowTypical,
    /// No dosage given (zero), nothing to compare.
    Unspecified,
}

impl HerbRecord {
    pub fn primary_function(&self) -> Option<&str> {
        self.functions.first().map(String::as_str)
    }

    pub fn most_likely_role(&self) -> Option<Role> {
        self.typical_roles.first().copied()
    }

    pub fn thermal_nature(&self) -> ThermalNature {
        ThermalNature::from_description(&self.properties.taste_temperature)
    }

    /// First two functions joined for rationale text, `None` when no functions are recorded.
    pub fn functions_summary(&self) -> Option<String> {
        match self.functions.as_slice() {
            [] => None,
            [only] => Some(only.clone()),
            [first, second, ..] => Some(format!("{first} and {second}")),
        }
    }

    pub fn dosage_status(&self, dosage: f64) -> DosageRangeStatus {
        let (min, max) = self.typical_dosage_range;
        if dosage <= 0.0 {
            DosageRangeStatus::Unspecified
        } else if max > 0.0 && dosage > max {
            DosageRangeStatus::AboveTypical
        } else if min > 0.0 && dosage < min * 0.5 {
            DosageRangeStatus::WellBelowTypical
        } else {
            DosageRangeStatus::Typical
        }
    }
}
