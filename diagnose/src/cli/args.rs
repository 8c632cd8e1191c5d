//! CLI argument definitions using clap
//!
//! Commands:
//! - diagnose forward <symptoms>... [--explain <fact>]
//! - diagnose backward --goal <fact> <symptoms>... [--trace]
//! - diagnose facts [--kind <kind>]
//! - diagnose rules

use clap::{Parser, Subcommand, ValueEnum};
use medical_rules::FactKind;
use std::path::PathBuf;

/// Rule-based medical diagnosis with forward and backward chaining
#[derive(Parser, Debug)]
#[command(name = "diagnose")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Rule book to load instead of the embedded dataset (.toml or .json)
    #[arg(long, global = true)]
    pub rules: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive every diagnosis and recommendation the symptoms support
    Forward {
        /// Symptoms by name or by their number in `diagnose facts`
        #[arg(value_delimiter = ',')]
        symptoms: Vec<String>,

        /// Only explain how this fact was derived
        #[arg(long)]
        explain: Option<String>,
    },

    /// Try to prove a single goal from the symptoms
    Backward {
        /// Fact to prove, e.g. `flu` or `rest`
        #[arg(long)]
        goal: String,

        /// Symptoms by name or by their number in `diagnose facts`
        #[arg(value_delimiter = ',')]
        symptoms: Vec<String>,

        /// Print the search trace
        #[arg(long)]
        trace: bool,
    },

    /// List known facts
    Facts {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },

    /// List rules in priority order
    Rules,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Symptom,
    Diagnosis,
    Recommendation,
}

impl From<KindArg> for FactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Symptom => FactKind::Symptom,
            KindArg::Diagnosis => FactKind::Diagnosis,
            KindArg::Recommendation => FactKind::Recommendation,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
