//! CLI command implementations

use anyhow::{Context, Result};
use inference_core::{DiagnosisEngine, ExplanationBuilder, KnowledgeBase};
use medical_rules::{FactKind, RuleBook};
use std::io::Write;
use std::path::Path;
use tracing::debug;

use super::args::{Cli, Command};
use super::io::{
    write_backward, write_facts, write_forward, write_json, write_rules, BackwardReport,
    FactsReport, ForwardReport,
};

/// Run the parsed command, writing its output to `out`.
pub fn run_command(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let engine = load_engine(cli.rules.as_deref())?;
    let kb = engine.knowledge_base();

    match &cli.command {
        Command::Forward { symptoms, explain } => {
            let symptoms = resolve_symptoms(kb, symptoms);
            let result = engine.run_forward_chaining(&symptoms)?;
            let explanation = match explain {
                Some(fact) => ExplanationBuilder::explain_fact(&result, fact),
                None => engine.explain(&result),
            };
            let report = ForwardReport {
                result: &result,
                explanation,
            };
            if cli.json {
                write_json(out, &report)
            } else {
                write_forward(out, kb, &report)
            }
        }

        Command::Backward {
            goal,
            symptoms,
            trace,
        } => {
            let symptoms = resolve_symptoms(kb, symptoms);
            let result = engine.run_backward_chaining(&symptoms, goal)?;
            let report = BackwardReport {
                explanation: engine.explain(&result),
                result: &result,
            };
            if cli.json {
                write_json(out, &report)
            } else {
                write_backward(out, &report, *trace)
            }
        }

        Command::Facts { kind } => {
            let report = FactsReport::new(kb, kind.map(FactKind::from));
            if cli.json {
                write_json(out, &report)
            } else {
                write_facts(out, &report)
            }
        }

        Command::Rules => {
            if cli.json {
                write_json(out, kb.rules())
            } else {
                write_rules(out, kb.rules())
            }
        }
    }
}

/// Build the engine from `rules`, or from the embedded dataset when absent.
pub fn load_engine(rules: Option<&Path>) -> Result<DiagnosisEngine> {
    let Some(path) = rules else {
        return Ok(DiagnosisEngine::medical()?);
    };

    debug!(path = %path.display(), "loading rule book");
    let book = RuleBook::from_path(path)
        .with_context(|| format!("failed to load rule book {}", path.display()))?;
    DiagnosisEngine::from_rule_book(&book)
        .with_context(|| format!("invalid rule book {}", path.display()))
}

/// Turn command-line symptom tokens into fact identifiers.
///
/// A number selects a symptom by its 1-based position in `diagnose facts`.
/// Anything else is taken as a name, lowercased with spaces and dashes folded
/// into underscores. Tokens that match nothing pass through unchanged so the
/// engine reports them as unknown.
pub fn resolve_symptoms(kb: &KnowledgeBase, tokens: &[String]) -> Vec<String> {
    let symptoms: Vec<_> = kb.facts_of_kind(FactKind::Symptom).collect();

    tokens
        .iter()
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<usize>() {
            Ok(n) if (1..=symptoms.len()).contains(&n) => symptoms[n - 1].id.to_string(),
            Ok(_) => token.to_string(),
            Err(_) => token.to_lowercase().replace([' ', '-'], "_"),
        })
        .collect()
}
