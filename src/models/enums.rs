use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serialized form equals `as_str()`; parsing is ASCII case-insensitive and
/// also accepts any listed alias verbatim.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal $(| $alias:literal)*),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s)]
                $variant
            ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($s) $(|| s == $alias)* {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ModelError::InvalidEnum {
                    field: stringify!($name).into(),
                    value: s.into(),
                })
            }
        }
    };
}

str_enum!(Role {
    Monarch => "Monarch" | "君药" | "君",
    Minister => "Minister" | "臣药" | "臣",
    Assistant => "Assistant" | "佐药" | "佐",
    Envoy => "Envoy" | "使药" | "使",
});

impl Role {
    /// Traditional label used in prescriptions (君药, 臣药, 佐药, 使药).
    pub fn chinese_label(&self) -> &'static str {
        match self {
            Self::Monarch => "君药",
            Self::Minister => "臣药",
            Self::Assistant => "佐药",
            Self::Envoy => "使药",
        }
    }

    /// Lowercase form used inside rationale sentences ("monarch herb").
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Monarch => "monarch",
            Self::Minister => "minister",
            Self::Assistant => "assistant",
            Self::Envoy => "envoy",
        }
    }
}

str_enum!(ThermalNature {
    Hot => "hot",
    Warm => "warm",
    Neutral => "neutral",
    Cool => "cool",
    Cold => "cold",
});

impl ThermalNature {
    /// Classify a taste/temperature description such as "bitter, slightly cold".
    pub fn from_description(taste_temperature: &str) -> Self {
        let lower = taste_temperature.to_lowercase();
        if lower.contains("hot") {
            Self::Hot
        } else if lower.contains("warm") {
            Self::Warm
        } else if lower.contains("cold") {
            Self::Cold
        } else if lower.contains("cool") {
            Self::Cool
        } else {
            Self::Neutral
        }
    }

    pub fn is_warming(&self) -> bool {
        matches!(self, Self::Hot | Self::Warm)
    }

    pub fn is_cooling(&self) -> bool {
        matches!(self, Self::Cool | Self::Cold)
    }
}

str_enum!(MatchPosition {
    Prefix => "prefix",
    Suffix => "suffix",
    Contains => "contains",
});

impl MatchPosition {
    pub fn matches(&self, name: &str, pattern: &str) -> bool {
        if pattern.is_empty() {
            return false;
        }
        match self {
            Self::Prefix => name.starts_with(pattern),
            Self::Suffix => name.ends_with(pattern),
            Self::Contains => name.contains(pattern),
        }
    }
}
