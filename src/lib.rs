pub mod analysis;
pub mod config;
pub mod knowledge;
pub mod models;

pub use analysis::{AnalysisResult, DefaultRoleAnalyzer, FormulaRoleAnalyzer, HerbRoleAssignment};
pub use knowledge::{KnowledgeBase, KnowledgeError};
pub use models::{HerbInput, Role};

use std::sync::{Arc, LazyLock};

use tracing_subscriber::EnvFilter;

/// Analyzer over the bundled knowledge base, built on first use.
static BUNDLED_ANALYZER: LazyLock<DefaultRoleAnalyzer> = LazyLock::new(|| {
    let knowledge = KnowledgeBase::bundled().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Bundled knowledge base failed to load, using empty base");
        KnowledgeBase::empty()
    });
    DefaultRoleAnalyzer::new(Arc::new(knowledge), config::AnalyzerConfig::default())
});

/// Process-wide analyzer backed by the bundled knowledge base.
pub fn bundled_analyzer() -> &'static DefaultRoleAnalyzer {
    &BUNDLED_ANALYZER
}

/// Classify herbs with the bundled knowledge base and default thresholds.
pub fn analyze(herb_inputs: &[HerbInput]) -> AnalysisResult {
    BUNDLED_ANALYZER.analyze(herb_inputs)
}

/// Install a stderr fmt subscriber filtered by RUST_LOG, or the default filter.
/// A second call is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
