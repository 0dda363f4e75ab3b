pub mod classify;
pub mod dosage;
pub mod engine;
pub mod messages;
pub mod summary;
pub mod types;

pub use classify::{ParsedHerb, RoleClassifier};
pub use dosage::{format_dosage, parse_dosage};
pub use engine::DefaultRoleAnalyzer;
pub use summary::summarize;
pub use types::{
    AnalysisResult, AnalysisSummary, CompositionAnalysis, FormulaRoleAnalyzer, HerbRoleAssignment,
    RoleBuckets, RoleStats,
};
