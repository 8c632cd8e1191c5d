//! Forward chaining - derive every fact provable from the input symptoms.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, debug_span};

use super::{combine_confidence, seed_inputs, weakest_confidence, ChainingConfig};
use crate::error::{InferenceError, UnknownFactError};
use crate::knowledge_base::{FactId, KnowledgeBase, Rule};
use crate::working_memory::{ApplicationEvent, Premise, QueryId, WorkingMemory};

/// Everything a forward-chaining run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardChainResult {
    pub query_id: QueryId,

    /// Every asserted fact, inputs included.
    pub derived_facts: BTreeMap<FactId, f64>,

    /// Rule applications in the order they happened.
    pub chain: Vec<ApplicationEvent>,

    /// Input identifiers that were dropped.
    pub notices: Vec<UnknownFactError>,

    /// Number of passes that asserted at least one fact.
    pub passes: usize,
}

impl ForwardChainResult {
    /// Check if a fact was derived or supplied.
    pub fn contains(&self, fact: &str) -> bool {
        self.derived_facts.contains_key(fact)
    }

    /// Get the confidence of a derived or supplied fact.
    pub fn confidence(&self, fact: &str) -> Option<f64> {
        self.derived_facts.get(fact).copied()
    }

    /// Facts concluded by rules, in derivation order.
    pub fn concluded_facts(&self) -> impl Iterator<Item = (&FactId, f64)> {
        self.chain
            .iter()
            .map(|event| (&event.resulting_fact, event.resulting_confidence))
    }
}

/// Runs rules to a fixed point over a fresh working memory.
pub struct ForwardChainer<'kb> {
    kb: &'kb KnowledgeBase,
    config: ChainingConfig,
}

impl<'kb> ForwardChainer<'kb> {
    /// Create a new forward chainer with the given configuration.
    pub fn new(kb: &'kb KnowledgeBase, config: ChainingConfig) -> Self {
        Self { kb, config }
    }

    /// Create a forward chainer without pass ceiling.
    pub fn with_defaults(kb: &'kb KnowledgeBase) -> Self {
        Self::new(kb, ChainingConfig::default())
    }

    /// Run forward chaining from the given input facts.
    ///
    /// # Algorithm
    ///
    /// 1. Seed working memory with the valid inputs at confidence 1.0
    /// 2. Make a pass over all rules in declaration order, keeping for each
    ///    unasserted consequent the strongest rule whose antecedents are all
    ///    asserted (ties go to the earlier rule)
    /// 3. Assert the candidates that share the highest confidence of the pass
    /// 4. Repeat until a pass finds no candidate
    ///
    /// A derived confidence never exceeds its antecedents, so nothing still
    /// pending can beat the strongest candidate: every fact is asserted once,
    /// at the best confidence any derivation reaches. Only passes that assert
    /// something are counted, so a run takes at most `kb.fact_count()` passes.
    pub fn run<I, S>(&self, inputs: I) -> Result<ForwardChainResult, InferenceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut memory = WorkingMemory::new();
        let query_id = memory.query_id();
        let notices = seed_inputs(self.kb, &mut memory, inputs);

        let span = debug_span!("forward_chaining", query = %query_id);
        let _enter = span.enter();

        let mut passes = 0;
        loop {
            let candidates = self.candidates(&memory, passes + 1);
            let Some(strongest) = candidates
                .iter()
                .map(|event| event.resulting_confidence)
                .reduce(f64::max)
            else {
                break;
            };

            if let Some(limit) = self.config.max_passes {
                if passes >= limit {
                    return Err(InferenceError::PassLimitExceeded { limit });
                }
            }
            passes += 1;

            for event in candidates {
                if event.resulting_confidence < strongest {
                    continue;
                }
                debug!(
                    pass = passes,
                    rule = %event.rule_id,
                    fact = %event.resulting_fact,
                    confidence = event.resulting_confidence,
                    "rule fired"
                );
                memory.record(event);
            }
        }

        Ok(ForwardChainResult {
            query_id,
            derived_facts: memory.derived_facts(),
            chain: memory.into_chain(),
            notices,
            passes,
        })
    }

    /// The strongest applicable rule for each unasserted consequent, in
    /// declaration order of the rule that first produced it.
    fn candidates(&self, memory: &WorkingMemory, pass: usize) -> Vec<ApplicationEvent> {
        let mut candidates: Vec<ApplicationEvent> = Vec::new();
        let mut slots: HashMap<&FactId, usize> = HashMap::new();

        for rule in self.kb.rules() {
            if memory.is_asserted(rule.consequent.as_str()) {
                continue;
            }
            let Some(event) = Self::try_apply(rule, memory, pass) else {
                continue;
            };
            match slots.get(&rule.consequent) {
                Some(&slot) => {
                    if event.resulting_confidence > candidates[slot].resulting_confidence {
                        candidates[slot] = event;
                    }
                }
                None => {
                    slots.insert(&rule.consequent, candidates.len());
                    candidates.push(event);
                }
            }
        }

        candidates
    }

    /// Build the application event for `rule` if all of its antecedents hold.
    fn try_apply(rule: &Rule, memory: &WorkingMemory, pass: usize) -> Option<ApplicationEvent> {
        let premises = rule
            .antecedents
            .iter()
            .map(|fact| {
                memory.confidence(fact.as_str()).map(|confidence| Premise {
                    fact: fact.clone(),
                    confidence,
                })
            })
            .collect::<Option<Vec<_>>>()?;

        let weakest = weakest_confidence(premises.iter().map(|p| p.confidence))?;
        let confidence = combine_confidence(rule.confidence, weakest);
        Some(ApplicationEvent::new(pass, rule, premises, weakest, confidence))
    }
}
