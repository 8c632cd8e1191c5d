//! Application events - the record of one rule firing.

use serde::{Deserialize, Serialize};

use crate::knowledge_base::{FactId, Rule, RuleId};

/// An antecedent and the confidence it held when a rule fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Premise {
    pub fact: FactId,
    pub confidence: f64,
}

/// One rule application during forward chaining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    /// The 1-based pass the rule fired in.
    pub pass: usize,

    pub rule_id: RuleId,

    /// Antecedents in rule order, with their confidences at firing time.
    pub premises: Vec<Premise>,

    /// Weakest antecedent confidence, before the rule's own confidence is applied.
    pub confidence_before_combination: f64,

    pub rule_confidence: f64,
    pub resulting_confidence: f64,
    pub resulting_fact: FactId,
}

impl ApplicationEvent {
    /// Record the application of `rule` over already-established premises.
    pub fn new(
        pass: usize,
        rule: &Rule,
        premises: Vec<Premise>,
        confidence_before_combination: f64,
        resulting_confidence: f64,
    ) -> Self {
        Self {
            pass,
            rule_id: rule.id.clone(),
            premises,
            confidence_before_combination,
            rule_confidence: rule.confidence,
            resulting_confidence,
            resulting_fact: rule.consequent.clone(),
        }
    }

    /// Antecedent IDs in rule order.
    pub fn antecedents(&self) -> impl Iterator<Item = &FactId> {
        self.premises.iter().map(|p| &p.fact)
    }
}
