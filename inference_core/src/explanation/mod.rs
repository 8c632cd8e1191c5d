//! Explanation - turns a reasoning chain into readable steps and graph edges.
//!
//! The builder is a pure transformation: it never consults the knowledge base
//! and never mentions a fact that is not already in the chain it was given.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::chaining::{BackwardChainResult, ForwardChainResult, ProofChain, ProofNode};
use crate::knowledge_base::{FactId, RuleId};
use crate::working_memory::ApplicationEvent;

/// A directed edge from an antecedent to the fact it helped establish.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: FactId,
    pub to: FactId,
    pub rule_id: RuleId,
}

/// Ordered explanation of a derivation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Explanation {
    pub steps: Vec<String>,
    pub edges: Vec<Edge>,
}

impl Explanation {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every fact mentioned by an edge.
    pub fn facts(&self) -> HashSet<&FactId> {
        self.edges
            .iter()
            .flat_map(|edge| [&edge.from, &edge.to])
            .collect()
    }

    fn push(&mut self, antecedents: &[&FactId], consequent: &FactId, rule_id: &RuleId, confidence: f64) {
        let names: Vec<_> = antecedents.iter().map(|fact| fact.as_str()).collect();
        self.steps.push(format!(
            "{} ⟹ {} (rule {}, confidence {:.2})",
            names.join(" ∧ "),
            consequent,
            rule_id,
            confidence
        ));
        for antecedent in antecedents {
            self.edges.push(Edge {
                from: (*antecedent).clone(),
                to: consequent.clone(),
                rule_id: rule_id.clone(),
            });
        }
    }
}

/// The chains an explanation can be built from.
#[derive(Debug, Clone, Copy)]
pub enum ChainRef<'a> {
    /// Forward-chaining application events, in firing order.
    Forward(&'a [ApplicationEvent]),
    /// Backward-chaining proof nodes, in pre-order from the goal.
    Proof(&'a [ProofNode]),
}

impl<'a> From<&'a [ApplicationEvent]> for ChainRef<'a> {
    fn from(events: &'a [ApplicationEvent]) -> Self {
        ChainRef::Forward(events)
    }
}

impl<'a> From<&'a Vec<ApplicationEvent>> for ChainRef<'a> {
    fn from(events: &'a Vec<ApplicationEvent>) -> Self {
        ChainRef::Forward(events)
    }
}

impl<'a> From<&'a ForwardChainResult> for ChainRef<'a> {
    fn from(result: &'a ForwardChainResult) -> Self {
        ChainRef::Forward(&result.chain)
    }
}

impl<'a> From<&'a ProofChain> for ChainRef<'a> {
    fn from(chain: &'a ProofChain) -> Self {
        ChainRef::Proof(chain.nodes())
    }
}

impl<'a> From<&'a BackwardChainResult> for ChainRef<'a> {
    fn from(result: &'a BackwardChainResult) -> Self {
        ChainRef::Proof(result.proof_chain.as_ref().map(ProofChain::nodes).unwrap_or(&[]))
    }
}

/// Stateless explanation builder.
pub struct ExplanationBuilder;

impl ExplanationBuilder {
    /// Explain a forward chain or a backward proof.
    ///
    /// Forward steps follow firing order. Proof steps run from the input
    /// symptoms up to the goal, so every step only uses facts established by
    /// earlier steps.
    pub fn explain<'a>(chain: impl Into<ChainRef<'a>>) -> Explanation {
        match chain.into() {
            ChainRef::Forward(events) => Self::explain_events(events.iter()),
            ChainRef::Proof(nodes) => Self::explain_proof(nodes),
        }
    }

    /// Explain how one fact was derived by a forward chain.
    ///
    /// Only the events that support `fact` are kept, in firing order. An input
    /// fact, or one the chain never derived, yields an empty explanation.
    pub fn explain_fact<'a>(chain: impl Into<ChainRef<'a>>, fact: &str) -> Explanation {
        match chain.into() {
            ChainRef::Forward(events) => {
                let mut needed: HashSet<&str> = HashSet::from([fact]);
                let mut keep = vec![false; events.len()];

                // Producers precede their consumers, so one reverse sweep
                // collects the whole support set.
                for (i, event) in events.iter().enumerate().rev() {
                    if needed.contains(event.resulting_fact.as_str()) {
                        keep[i] = true;
                        needed.extend(event.antecedents().map(FactId::as_str));
                    }
                }

                Self::explain_events(
                    events
                        .iter()
                        .zip(keep)
                        .filter_map(|(event, keep)| keep.then_some(event)),
                )
            }
            ChainRef::Proof(nodes) => {
                let Some(start) = nodes.iter().position(|node| node.fact.as_str() == fact) else {
                    return Explanation::default();
                };
                let depth = nodes[start].depth;
                let end = nodes[start + 1..]
                    .iter()
                    .position(|node| node.depth <= depth)
                    .map_or(nodes.len(), |offset| start + 1 + offset);
                Self::explain_proof(&nodes[start..end])
            }
        }
    }

    fn explain_events<'a>(events: impl Iterator<Item = &'a ApplicationEvent>) -> Explanation {
        let mut explanation = Explanation::default();
        for event in events {
            let antecedents: Vec<_> = event.antecedents().collect();
            explanation.push(
                &antecedents,
                &event.resulting_fact,
                &event.rule_id,
                event.resulting_confidence,
            );
        }
        explanation
    }

    fn explain_proof(nodes: &[ProofNode]) -> Explanation {
        let mut explanation = Explanation::default();
        // Reversed pre-order puts every node after all of its descendants.
        for node in nodes.iter().rev() {
            if let Some(rule_id) = &node.rule_id {
                let antecedents: Vec<_> = node.antecedents.iter().collect();
                explanation.push(&antecedents, &node.fact, rule_id, node.confidence);
            }
        }
        explanation
    }
}
