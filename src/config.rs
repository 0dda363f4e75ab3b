use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Fangji";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory (~/Fangji/), if a home directory exists
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

/// Get the directory checked for a user-maintained knowledge base
pub fn knowledge_dir() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("knowledge"))
}

/// Log filter used when RUST_LOG is not set
pub fn default_log_filter() -> &'static str {
    "fangji_lib=info,fangji=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config read failed ({0}): {1}")]
    Read(String, String),

    #[error("Config parse failed: {0}")]
    Parse(String),

    #[error("Config value out of range: {field} = {value}")]
    OutOfRange { field: String, value: f64 },
}

/// Confidence attached to each kind of evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceTable {
    /// Role taken from a matched classical formula.
    pub pattern: f64,
    /// Herb whose primary function harmonizes the formula.
    pub harmonizer: f64,
    /// Ginger/jujube-class envoy at low dosage.
    pub guiding_envoy: f64,
    /// Highest-dosage herb promoted to monarch.
    pub monarch: f64,
    /// Minister or assistant chosen by dosage ranking.
    pub ranked: f64,
    /// Ceiling for herbs absent from the knowledge base.
    pub unknown_herb: f64,
}

impl Default for ConfidenceTable {
    fn default() -> Self {
        Self {
            pattern: 0.9,
            harmonizer: 0.95,
            guiding_envoy: 0.9,
            monarch: 0.8,
            ranked: 0.7,
            unknown_herb: 0.5,
        }
    }
}

/// Tunable thresholds of the role analyzer. Missing JSON fields keep defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Minimum share of a formula's composition for a pattern match.
    pub pattern_match_threshold: f64,
    /// Herbs ranked right after the monarch need at least this dosage to be ministers.
    pub minister_min_dosage: f64,
    /// How many ranked positions after the monarch may become ministers.
    pub minister_slots: usize,
    /// Primary function marking a herb as the formula's harmonizer.
    pub harmonizer_function: String,
    /// Herbs treated as guiding envoys at low dosage.
    pub guiding_envoy_herbs: Vec<String>,
    pub guiding_envoy_max_dosage: f64,
    pub confidence: ConfidenceTable,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pattern_match_threshold: 0.6,
            minister_min_dosage: 9.0,
            minister_slots: 2,
            harmonizer_function: "harmonizes all other herbs".into(),
            guiding_envoy_herbs: vec!["生姜".into(), "大枣".into()],
            guiding_envoy_max_dosage: 10.0,
            confidence: ConfidenceTable::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Threshold and confidences must lie in [0, 1]; dosages must be non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_interval = [
            ("pattern_match_threshold", self.pattern_match_threshold),
            ("confidence.pattern", self.confidence.pattern),
            ("confidence.harmonizer", self.confidence.harmonizer),
            ("confidence.guiding_envoy", self.confidence.guiding_envoy),
            ("confidence.monarch", self.confidence.monarch),
            ("confidence.ranked", self.confidence.ranked),
            ("confidence.unknown_herb", self.confidence.unknown_herb),
        ];
        for (field, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field: field.into(),
                    value,
                });
            }
        }

        let dosages = [
            ("minister_min_dosage", self.minister_min_dosage),
            ("guiding_envoy_max_dosage", self.guiding_envoy_max_dosage),
        ];
        for (field, value) in dosages {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange {
                    field: field.into(),
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn is_guiding_envoy(&self, herb_name: &str) -> bool {
        self.guiding_envoy_herbs.iter().any(|h| h == herb_name)
    }
}
