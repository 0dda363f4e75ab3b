//! Fangji CLI
//!
//! Usage:
//!   fangji analyze [FILE] [--pretty] [--knowledge-dir <DIR>] [--config <FILE>]
//!   fangji herb <NAME>
//!   fangji herbs
//!   fangji formulas [NAME]

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use fangji_lib::config::{self, AnalyzerConfig};
use fangji_lib::knowledge::{KnowledgeBase, HERBS_FILE};
use fangji_lib::{DefaultRoleAnalyzer, FormulaRoleAnalyzer, HerbInput};

#[derive(Parser)]
#[command(name = "fangji")]
#[command(version)]
#[command(about = "Classify the herbs of a formula as monarch, minister, assistant or envoy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Knowledge directory (herbs.json, formulas.json, name_heuristics.json)
    #[arg(short, long, global = true)]
    knowledge_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a formula given as a JSON array of herbs
    Analyze {
        /// Input file (stdin if not specified)
        file: Option<PathBuf>,

        /// Analyzer thresholds (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the knowledge-base record of one herb
    Herb {
        name: String,
    },

    /// List every herb name in the knowledge base
    Herbs,

    /// List the classical formulas used for pattern matching, or show one
    Formulas {
        /// Canonical formula name, e.g. 四君子汤
        name: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fangji_lib::init_tracing();
    let cli = Cli::parse();
    let knowledge = load_knowledge(cli.knowledge_dir.as_deref())?;

    let output: serde_json::Value = match cli.command {
        Commands::Analyze { file, config } => {
            let herbs = read_herbs(file.as_deref())?;
            let config = match config {
                Some(path) => AnalyzerConfig::load(&path)?,
                None => AnalyzerConfig::default(),
            };
            let analyzer = DefaultRoleAnalyzer::new(Arc::new(knowledge), config);
            serde_json::to_value(analyzer.analyze(&herbs))?
        }
        Commands::Herb { name } => match knowledge.lookup(&name) {
            Some(record) => serde_json::to_value(record)?,
            None => serde_json::json!({
                "name": name.trim(),
                "known": false,
                "inferred_function": knowledge.infer_function(&name),
            }),
        },
        Commands::Herbs => serde_json::to_value(knowledge.herbs.names().collect::<Vec<_>>())?,
        Commands::Formulas { name: Some(name) } => match knowledge.patterns.get(name.trim()) {
            Some(pattern) => serde_json::to_value(pattern)?,
            None => return Err(format!("unknown formula: {}", name.trim()).into()),
        },
        Commands::Formulas { name: None } => serde_json::to_value(
            knowledge
                .patterns
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "canonical_name": p.canonical_name,
                        "english_name": p.english_name,
                        "composition": p.composition,
                    })
                })
                .collect::<Vec<_>>(),
        )?,
    };

    if cli.pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", serde_json::to_string(&output)?);
    }
    Ok(())
}

/// Explicit directory first, then ~/Fangji/knowledge when it holds data,
/// then the bundled base.
fn load_knowledge(dir: Option<&Path>) -> Result<KnowledgeBase, Box<dyn std::error::Error>> {
    if let Some(dir) = dir {
        return Ok(KnowledgeBase::load(dir)?);
    }
    if let Some(dir) = config::knowledge_dir().filter(|d| d.join(HERBS_FILE).is_file()) {
        return Ok(KnowledgeBase::load(&dir)?);
    }
    Ok(KnowledgeBase::bundled()?)
}

fn read_herbs(file: Option<&Path>) -> Result<Vec<HerbInput>, Box<dyn std::error::Error>> {
    let json = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(serde_json::from_str(&json)?)
}
