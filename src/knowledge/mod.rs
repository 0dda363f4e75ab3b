pub mod heuristics;
pub mod herbs;
pub mod patterns;

pub use heuristics::{FunctionInference, NameHeuristics, NoInference};
pub use herbs::HerbKnowledgeBase;
pub use patterns::{FormulaPatternLibrary, PatternMatch};

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::models::HerbRecord;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Knowledge data load failed ({0}): {1}")]
    DataLoad(String, String),

    #[error("Knowledge data parse failed ({0}): {1}")]
    DataParse(String, String),

    #[error("Duplicate herb record: {0}")]
    DuplicateHerb(String),

    #[error("Duplicate formula pattern: {0}")]
    DuplicatePattern(String),

    #[error("Formula {pattern} assigns {herb}, which is not in its composition")]
    InvalidPattern { pattern: String, herb: String },

    #[error("Formula {pattern} lists {herb} more than once")]
    DuplicateRole { pattern: String, herb: String },
}

pub const HERBS_FILE: &str = "herbs.json";
pub const FORMULAS_FILE: &str = "formulas.json";
pub const HEURISTICS_FILE: &str = "name_heuristics.json";

const BUNDLED_HERBS: &str = include_str!("../../data/herbs.json");
const BUNDLED_FORMULAS: &str = include_str!("../../data/formulas.json");
const BUNDLED_HEURISTICS: &str = include_str!("../../data/name_heuristics.json");

/// Used when no function description can be inferred at all.
pub const UNRECORDED_FUNCTION: &str = "function not recorded in the knowledge base";

/// Immutable knowledge shared by every analysis: herb records, classical
/// formula patterns and the strategy describing herbs missing from the base.
pub struct KnowledgeBase {
    pub herbs: HerbKnowledgeBase,
    pub patterns: FormulaPatternLibrary,
    inference: Arc<dyn FunctionInference>,
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("herbs", &self.herbs.len())
            .field("patterns", &self.patterns.len())
            .finish()
    }
}

impl KnowledgeBase {
    pub fn new(
        herbs: HerbKnowledgeBase,
        patterns: FormulaPatternLibrary,
        inference: Arc<dyn FunctionInference>,
    ) -> Self {
        let knowledge = Self {
            herbs,
            patterns,
            inference,
        };
        knowledge.warn_uncovered_pattern_herbs();
        knowledge
    }

    /// Knowledge compiled into the binary from `data/`.
    pub fn bundled() -> Result<Self, KnowledgeError> {
        Self::from_json(BUNDLED_HERBS, BUNDLED_FORMULAS, BUNDLED_HEURISTICS)
    }

    /// Load knowledge from a directory holding herbs.json, formulas.json and
    /// name_heuristics.json.
    pub fn load(dir: &Path) -> Result<Self, KnowledgeError> {
        let herbs = read_data_file(dir, HERBS_FILE)?;
        let formulas = read_data_file(dir, FORMULAS_FILE)?;
        let heuristics = read_data_file(dir, HEURISTICS_FILE)?;

        let knowledge = Self::from_json(&herbs, &formulas, &heuristics)?;
        tracing::info!(
            dir = %dir.display(),
            herbs = knowledge.herbs.len(),
            patterns = knowledge.patterns.len(),
            "Knowledge base loaded"
        );
        Ok(knowledge)
    }

    pub fn from_json(
        herbs_json: &str,
        formulas_json: &str,
        heuristics_json: &str,
    ) -> Result<Self, KnowledgeError> {
        let records: Vec<HerbRecord> = serde_json::from_str(herbs_json)
            .map_err(|e| KnowledgeError::DataParse(HERBS_FILE.into(), e.to_string()))?;
        let patterns = serde_json::from_str(formulas_json)
            .map_err(|e| KnowledgeError::DataParse(FORMULAS_FILE.into(), e.to_string()))?;
        let heuristics: NameHeuristics = serde_json::from_str(heuristics_json)
            .map_err(|e| KnowledgeError::DataParse(HEURISTICS_FILE.into(), e.to_string()))?;

        Ok(Self::new(
            HerbKnowledgeBase::from_records(records)?,
            FormulaPatternLibrary::from_patterns(patterns)?,
            Arc::new(heuristics),
        ))
    }

    /// No herbs, no patterns, no inference. Every herb falls back to dosage ranking.
    pub fn empty() -> Self {
        Self {
            herbs: HerbKnowledgeBase::default(),
            patterns: FormulaPatternLibrary::default(),
            inference: Arc::new(NoInference),
        }
    }

    /// Replace the strategy used to describe herbs absent from the base.
    pub fn with_inference(mut self, inference: Arc<dyn FunctionInference>) -> Self {
        self.inference = inference;
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&HerbRecord> {
        self.herbs.lookup(name)
    }

    /// First two recorded functions, or a name-based description for herbs
    /// the base does not know.
    pub fn get_functions_summary(&self, name: &str) -> String {
        self.herbs
            .lookup(name)
            .and_then(HerbRecord::functions_summary)
            .unwrap_or_else(|| self.infer_function(name))
    }

    /// Description produced by the inference strategy alone.
    pub fn infer_function(&self, name: &str) -> String {
        self.inference
            .describe(name.trim())
            .unwrap_or_else(|| UNRECORDED_FUNCTION.to_string())
    }

    fn warn_uncovered_pattern_herbs(&self) {
        for pattern in self.patterns.iter() {
            for herb in &pattern.composition {
                if !self.herbs.contains(herb) {
                    tracing::warn!(
                        pattern = %pattern.canonical_name,
                        herb = %herb,
                        "Formula pattern references a herb missing from the herb base"
                    );
                }
            }
        }
    }
}

fn read_data_file(dir: &Path, file: &str) -> Result<String, KnowledgeError> {
    let path = dir.join(file);
    std::fs::read_to_string(&path)
        .map_err(|e| KnowledgeError::DataLoad(path.display().to_string(), e.to_string()))
}
