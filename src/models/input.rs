use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_UNIT: &str = "g";

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

/// `"dosage": null` reads the same as an omitted dosage.
fn null_as_default<'de, D>(deserializer: D) -> Result<RawDosage, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawDosage>::deserialize(deserializer)?.unwrap_or_default())
}

/// Dosage as supplied by the caller: a bare number or free text ("15g", "三片").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDosage {
    Number(f64),
    Text(String),
}

impl Default for RawDosage {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl From<f64> for RawDosage {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for RawDosage {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for RawDosage {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawDosage {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One herb of a prescription, as handed over by the calling layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HerbInput {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dosage: RawDosage,
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Preparation note, e.g. "pre-decocted".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing: Option<String>,
}

impl HerbInput {
    pub fn new(name: impl Into<String>, dosage: impl Into<RawDosage>) -> Self {
        Self {
            name: name.into(),
            dosage: dosage.into(),
            unit: default_unit(),
            processing: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_processing(mut self, processing: impl Into<String>) -> Self {
        self.processing = Some(processing.into());
        self
    }

    /// Canonical lookup key (surrounding whitespace removed).
    pub fn key(&self) -> &str {
        self.name.trim()
    }

    pub fn unit_or_default(&self) -> &str {
        match self.unit.trim() {
            "" => DEFAULT_UNIT,
            unit => unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_number_and_text_dosage() {
        let inputs: Vec<HerbInput> = serde_json::from_str(
            r#"[
                {"name": "黄芪", "dosage": 15},
                {"name": "白术", "dosage": "12g", "unit": "g", "processing": "dry-fried"},
                {"name": "生姜"}
            ]"#,
        )
        .unwrap();

        assert_eq!(inputs[0].dosage, RawDosage::Number(15.0));
        assert_eq!(inputs[0].unit, "g");
        assert_eq!(inputs[1].dosage, RawDosage::Text("12g".into()));
        assert_eq!(inputs[1].processing.as_deref(), Some("dry-fried"));
        assert_eq!(inputs[2].dosage, RawDosage::Number(0.0));
    }

    #[test]
    fn null_dosage_reads_as_zero() {
        let inputs: Vec<HerbInput> = serde_json::from_str(
            r#"[{"name": "甘草", "dosage": null}, {"name": "黄芪", "dosage": 15}]"#,
        )
        .unwrap();

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].dosage, RawDosage::Number(0.0));
        assert_eq!(inputs[1].dosage, RawDosage::Number(15.0));
    }

    #[test]
    fn builder_and_key() {
        let input = HerbInput::new(" 人参 ", 9).with_unit("").with_processing("decocted separately");
        assert_eq!(input.key(), "人参");
        assert_eq!(input.unit_or_default(), "g");
        assert_eq!(input.processing.as_deref(), Some("decocted separately"));
    }
}
