use std::collections::BTreeMap;

use crate::models::HerbRecord;

use super::KnowledgeError;

/// Read-only herb metadata keyed by exact herb name.
#[derive(Debug, Clone, Default)]
pub struct HerbKnowledgeBase {
    records: BTreeMap<String, HerbRecord>,
}

impl HerbKnowledgeBase {
    pub fn from_records(records: Vec<HerbRecord>) -> Result<Self, KnowledgeError> {
        let mut map = BTreeMap::new();
        for record in records {
            let name = record.name.trim().to_string();
            if map.contains_key(&name) {
                return Err(KnowledgeError::DuplicateHerb(name));
            }
            map.insert(name, record);
        }
        Ok(Self { records: map })
    }

    /// Exact match on the herb name. No fuzzy matching: callers normalize
    /// synonyms and character variants before calling.
    pub fn lookup(&self, name: &str) -> Option<&HerbRecord> {
        self.records.get(name.trim())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// True when the herb's primary function is `harmonizer_function`.
    pub fn is_harmonizer(&self, name: &str, harmonizer_function: &str) -> bool {
        self.lookup(name)
            .and_then(HerbRecord::primary_function)
            .is_some_and(|f| f == harmonizer_function)
    }

    /// Herb names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HerbProperties, Role};

    fn record(name: &str, functions: &[&str]) -> HerbRecord {
        HerbRecord {
            name: name.into(),
            properties: HerbProperties {
                taste_temperature: "sweet, neutral".into(),
                meridian_affinity: "spleen".into(),
            },
            functions: functions.iter().map(|f| f.to_string()).collect(),
            typical_roles: vec![Role::Assistant],
            typical_dosage_range: (3.0, 10.0),
            category: "test".into(),
        }
    }

    #[test]
    fn lookup_is_exact_but_trims() {
        let base = HerbKnowledgeBase::from_records(vec![record("茯苓", &["drains dampness"])]).unwrap();
        assert!(base.lookup("茯苓").is_some());
        assert!(base.lookup(" 茯苓\n").is_some());
        assert!(base.lookup("茯").is_none());
        assert!(base.lookup("白茯苓").is_none());
    }

    #[test]
    fn duplicate_records_rejected() {
        let err = HerbKnowledgeBase::from_records(vec![
            record("甘草", &["harmonizes all other herbs"]),
            record("甘草", &["tonifies qi"]),
        ])
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::DuplicateHerb(ref n) if n == "甘草"));
    }

    #[test]
    fn harmonizer_uses_primary_function_only() {
        let base = HerbKnowledgeBase::from_records(vec![
            record("甘草", &["harmonizes all other herbs", "tonifies qi"]),
            record("炙甘草", &["tonifies qi", "harmonizes all other herbs"]),
        ])
        .unwrap();
        assert!(base.is_harmonizer("甘草", "harmonizes all other herbs"));
        assert!(!base.is_harmonizer("炙甘草", "harmonizes all other herbs"));
        assert!(!base.is_harmonizer("大枣", "harmonizes all other herbs"));
    }

    #[test]
    fn names_are_sorted() {
        let base = HerbKnowledgeBase::from_records(vec![
            record("b", &[]),
            record("a", &[]),
            record("c", &[]),
        ])
        .unwrap();
        assert_eq!(base.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(base.len(), 3);
    }
}
