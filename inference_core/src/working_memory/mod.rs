//! Working Memory - per-query session state built up by a chaining run.
//!
//! Working memory is monotonic: a fact is asserted at most once and its
//! confidence is never lowered or removed for the rest of the run.

mod event;

pub use event::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::knowledge_base::{FactId, RuleId};

/// Unique identifier for one query, used to correlate its log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryId(pub Uuid);

impl QueryId {
    /// Create a new random query ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QueryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QueryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a fact came to be asserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "rule", rename_all = "lowercase")]
pub enum Provenance {
    /// Supplied directly by the caller.
    Input,
    /// Concluded by a rule.
    Rule(RuleId),
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Input => f.write_str("input"),
            Provenance::Rule(id) => write!(f, "rule {}", id),
        }
    }
}

/// A fact currently believed true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertedFact {
    pub fact: FactId,
    pub confidence: f64,
    pub provenance: Provenance,
}

impl std::fmt::Display for AssertedFact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [conf={:.2}, src={}]",
            self.fact, self.confidence, self.provenance
        )
    }
}

/// Facts asserted during one query plus the chain of rule applications.
#[derive(Debug, Clone, Default)]
pub struct WorkingMemory {
    query_id: QueryId,
    asserted: HashMap<FactId, AssertedFact>,
    /// Assertion order.
    order: Vec<FactId>,
    chain: Vec<ApplicationEvent>,
}

impl WorkingMemory {
    /// Create a new empty working memory with a fresh query ID.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query_id(&self) -> QueryId {
        self.query_id
    }

    /// Assert an input fact at confidence 1.0.
    ///
    /// Returns `false` if the fact was already asserted.
    pub fn seed(&mut self, fact: FactId) -> bool {
        self.insert(AssertedFact {
            fact,
            confidence: 1.0,
            provenance: Provenance::Input,
        })
    }

    /// Assert the consequent of an application event and append it to the chain.
    ///
    /// An event for a fact that is already asserted is discarded and `false`
    /// is returned; the existing assertion is left untouched.
    pub fn record(&mut self, event: ApplicationEvent) -> bool {
        let asserted = AssertedFact {
            fact: event.resulting_fact.clone(),
            confidence: event.resulting_confidence,
            provenance: Provenance::Rule(event.rule_id.clone()),
        };
        if self.insert(asserted) {
            self.chain.push(event);
            true
        } else {
            false
        }
    }

    fn insert(&mut self, asserted: AssertedFact) -> bool {
        if self.asserted.contains_key(&asserted.fact) {
            return false;
        }
        self.order.push(asserted.fact.clone());
        self.asserted.insert(asserted.fact.clone(), asserted);
        true
    }

    /// Check if a fact is currently asserted.
    pub fn is_asserted(&self, fact: &str) -> bool {
        self.asserted.contains_key(fact)
    }

    /// Get the confidence of an asserted fact.
    pub fn confidence(&self, fact: &str) -> Option<f64> {
        self.asserted.get(fact).map(|a| a.confidence)
    }

    /// Get an asserted fact with its provenance.
    pub fn get(&self, fact: &str) -> Option<&AssertedFact> {
        self.asserted.get(fact)
    }

    /// Iterate over asserted facts in assertion order.
    pub fn asserted_facts(&self) -> impl Iterator<Item = &AssertedFact> {
        self.order.iter().filter_map(|id| self.asserted.get(id))
    }

    /// The ordered chain of rule applications.
    pub fn chain(&self) -> &[ApplicationEvent] {
        &self.chain
    }

    /// Get the number of asserted facts.
    pub fn len(&self) -> usize {
        self.asserted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asserted.is_empty()
    }

    /// Snapshot of every asserted fact and its confidence.
    pub fn derived_facts(&self) -> BTreeMap<FactId, f64> {
        self.asserted
            .iter()
            .map(|(id, asserted)| (id.clone(), asserted.confidence))
            .collect()
    }

    /// Consume the memory, keeping only the application chain.
    pub fn into_chain(self) -> Vec<ApplicationEvent> {
        self.chain
    }
}
