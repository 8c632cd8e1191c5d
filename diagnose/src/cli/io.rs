//! Output rendering: plain text for people, JSON for scripts.

use anyhow::Result;
use inference_core::{
    BackwardChainResult, Explanation, Fact, FactId, ForwardChainResult, KnowledgeBase, Rule,
    UnknownFactError,
};
use medical_rules::FactKind;
use serde::Serialize;
use std::io::Write;

const KINDS: [FactKind; 3] = [FactKind::Symptom, FactKind::Diagnosis, FactKind::Recommendation];

#[derive(Debug, Serialize)]
pub struct ForwardReport<'a> {
    pub result: &'a ForwardChainResult,
    pub explanation: Explanation,
}

#[derive(Debug, Serialize)]
pub struct BackwardReport<'a> {
    pub result: &'a BackwardChainResult,
    pub explanation: Explanation,
}

/// Facts grouped by kind, in declaration order.
#[derive(Debug, Serialize)]
pub struct FactsReport<'a> {
    pub symptoms: Vec<&'a Fact>,
    pub diagnoses: Vec<&'a Fact>,
    pub recommendations: Vec<&'a Fact>,
}

impl<'a> FactsReport<'a> {
    pub fn new(kb: &'a KnowledgeBase, only: Option<FactKind>) -> Self {
        let collect = |kind: FactKind| -> Vec<&'a Fact> {
            if only.map_or(true, |only| only == kind) {
                kb.facts_of_kind(kind).collect()
            } else {
                Vec::new()
            }
        };
        Self {
            symptoms: collect(FactKind::Symptom),
            diagnoses: collect(FactKind::Diagnosis),
            recommendations: collect(FactKind::Recommendation),
        }
    }

    fn group(&self, kind: FactKind) -> &[&'a Fact] {
        match kind {
            FactKind::Symptom => &self.symptoms,
            FactKind::Diagnosis => &self.diagnoses,
            FactKind::Recommendation => &self.recommendations,
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_forward(out: &mut impl Write, kb: &KnowledgeBase, report: &ForwardReport<'_>) -> Result<()> {
    let result = report.result;
    write_notices(out, &result.notices)?;

    if result.chain.is_empty() {
        writeln!(out, "No new facts could be inferred from the given symptoms.")?;
    } else {
        let kind_of = |fact: &FactId| kb.fact(fact.as_str()).map(|f| f.kind);
        for kind in [FactKind::Diagnosis, FactKind::Recommendation] {
            let concluded: Vec<_> = result
                .concluded_facts()
                .filter(|&(fact, _)| kind_of(fact) == Some(kind))
                .collect();
            if concluded.is_empty() {
                continue;
            }
            writeln!(out, "{}:", group_title(kind))?;
            for (fact, confidence) in concluded {
                let description = kb.fact(fact.as_str()).map_or("", |f| f.description.as_str());
                writeln!(out, "  {:<20} {:.2}  {}", fact.as_str(), confidence, description)?;
            }
        }
    }

    write_steps(out, &report.explanation)?;
    writeln!(out, "Passes: {}", result.passes)?;
    Ok(())
}

pub fn write_backward(out: &mut impl Write, report: &BackwardReport<'_>, trace: bool) -> Result<()> {
    let result = report.result;
    write_notices(out, &result.notices)?;

    match result.confidence {
        Some(confidence) => writeln!(
            out,
            "Goal {}: PROVEN (confidence {:.2})",
            result.goal, confidence
        )?,
        None => writeln!(out, "Goal {}: NOT PROVEN", result.goal)?,
    }

    if let Some(chain) = &result.proof_chain {
        writeln!(out, "Proof:")?;
        for node in chain.nodes() {
            let indent = "  ".repeat(node.depth + 1);
            match &node.rule_id {
                Some(rule_id) => writeln!(
                    out,
                    "{}{} [rule {}, {:.2}]",
                    indent, node.fact, rule_id, node.confidence
                )?,
                None => writeln!(out, "{}{} [given]", indent, node.fact)?,
            }
        }
    }

    write_steps(out, &report.explanation)?;

    if trace {
        writeln!(out, "Search trace:")?;
        for step in &result.trace {
            writeln!(out, "  {}", step)?;
        }
    }
    Ok(())
}

pub fn write_facts(out: &mut impl Write, report: &FactsReport<'_>) -> Result<()> {
    for kind in KINDS {
        let facts = report.group(kind);
        if facts.is_empty() {
            continue;
        }
        writeln!(out, "{}:", group_title(kind))?;
        for (i, fact) in facts.iter().enumerate() {
            // Only symptoms are numbered; the numbers are valid CLI input.
            let marker = if kind == FactKind::Symptom {
                format!("{:>3}.", i + 1)
            } else {
                "   -".to_string()
            };
            if fact.description.is_empty() {
                writeln!(out, "{} {}", marker, fact.id)?;
            } else {
                writeln!(out, "{} {:<20} {}", marker, fact.id.as_str(), fact.description)?;
            }
        }
    }
    Ok(())
}

pub fn write_rules(out: &mut impl Write, rules: &[Rule]) -> Result<()> {
    for rule in rules {
        writeln!(out, "{}", rule)?;
        if !rule.description.is_empty() {
            writeln!(out, "    {}", rule.description)?;
        }
    }
    Ok(())
}

fn write_notices(out: &mut impl Write, notices: &[UnknownFactError]) -> Result<()> {
    for notice in notices {
        writeln!(out, "Ignored {}", notice)?;
    }
    Ok(())
}

fn write_steps(out: &mut impl Write, explanation: &Explanation) -> Result<()> {
    if explanation.is_empty() {
        return Ok(());
    }
    writeln!(out, "Explanation:")?;
    for (i, step) in explanation.steps.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, step)?;
    }
    Ok(())
}

fn group_title(kind: FactKind) -> &'static str {
    match kind {
        FactKind::Symptom => "Symptoms",
        FactKind::Diagnosis => "Diagnoses",
        FactKind::Recommendation => "Recommendations",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inference_core::DiagnosisEngine;

    fn render_facts(only: Option<FactKind>) -> String {
        let engine = DiagnosisEngine::medical().unwrap();
        let report = FactsReport::new(engine.knowledge_base(), only);
        let mut out = Vec::new();
        write_facts(&mut out, &report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_facts_grouped_by_kind() {
        let output = render_facts(None);
        assert!(output.starts_with("Symptoms:"));
        assert!(output.contains("\nDiagnoses:\n"));
        assert!(output.contains("  1. fever"));
        assert!(output.contains(" 15. swollen_lymph_nodes"));
    }

    #[test]
    fn test_facts_filtered() {
        let output = render_facts(Some(FactKind::Recommendation));
        assert!(output.starts_with("Recommendations:"));
        assert!(!output.contains("fever"));
    }

    #[test]
    fn test_backward_not_proven() {
        let engine = DiagnosisEngine::medical().unwrap();
        let result = engine.run_backward_chaining(["fever"], "flu").unwrap();
        let report = BackwardReport {
            explanation: engine.explain(&result),
            result: &result,
        };

        let mut out = Vec::new();
        write_backward(&mut out, &report, true).unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.starts_with("Goal flu: NOT PROVEN"));
        assert!(!output.contains("Proof:"));
        assert!(output.contains("Search trace:"));
        assert!(output.contains("[0] could not prove flu"));
    }
}
