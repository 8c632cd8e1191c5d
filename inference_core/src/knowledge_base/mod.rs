//! Knowledge Base module - the immutable rule and fact store shared by every query.
//!
//! A knowledge base is built once from a [`RuleBook`] and validated on the way in:
//! - every rule has at least one antecedent
//! - every referenced fact is declared
//! - no rule concludes one of its own antecedents
//! - rule confidences lie in `(0, 1]`
//!
//! After construction it is read-only, so it can be shared across threads
//! without locking.

mod fact;
mod rule;

pub use fact::*;
pub use rule::*;

use medical_rules::{FactKind, RuleBook};
use std::collections::{HashMap, HashSet};

use crate::error::ConfigurationError;

/// The validated set of known facts and rules.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    /// All facts stored by ID.
    facts: HashMap<FactId, Fact>,

    /// Fact IDs in declaration order.
    fact_order: Vec<FactId>,

    /// Rules in declaration (priority) order.
    rules: Vec<Rule>,

    /// Index: rule ID -> position in `rules`.
    rule_index: HashMap<RuleId, usize>,

    /// Index: consequent -> positions of rules concluding it, in priority order.
    rules_by_consequent: HashMap<FactId, Vec<usize>>,
}

impl KnowledgeBase {
    /// Build and validate a knowledge base from a rule book.
    pub fn from_rule_book(book: &RuleBook) -> Result<Self, ConfigurationError> {
        let mut facts: HashMap<FactId, Fact> = HashMap::with_capacity(book.facts.len());
        let mut fact_order = Vec::with_capacity(book.facts.len());

        for def in &book.facts {
            if def.id.is_empty() {
                return Err(ConfigurationError::EmptyIdentifier("fact"));
            }
            let fact = Fact::from(def);
            if facts.contains_key(&fact.id) {
                return Err(ConfigurationError::DuplicateFact { id: def.id.clone() });
            }
            fact_order.push(fact.id.clone());
            facts.insert(fact.id.clone(), fact);
        }

        let mut rules = Vec::with_capacity(book.rules.len());
        let mut rule_index: HashMap<RuleId, usize> = HashMap::with_capacity(book.rules.len());
        let mut rules_by_consequent: HashMap<FactId, Vec<usize>> = HashMap::new();

        for (priority, def) in book.rules.iter().enumerate() {
            if def.id.is_empty() {
                return Err(ConfigurationError::EmptyIdentifier("rule"));
            }
            let id = RuleId::new(def.id.as_str());
            if rule_index.contains_key(&id) {
                return Err(ConfigurationError::DuplicateRule { id: def.id.clone() });
            }
            if def.antecedents.is_empty() {
                return Err(ConfigurationError::EmptyAntecedents { rule: def.id.clone() });
            }
            if !(def.confidence > 0.0 && def.confidence <= 1.0) {
                return Err(ConfigurationError::InvalidConfidence {
                    rule: def.id.clone(),
                    confidence: def.confidence,
                });
            }

            let known = |fact: &str| -> Result<FactId, ConfigurationError> {
                if facts.contains_key(fact) {
                    Ok(FactId::new(fact))
                } else {
                    Err(ConfigurationError::UnknownFact {
                        rule: def.id.clone(),
                        fact: fact.to_string(),
                    })
                }
            };

            let consequent = known(def.consequent.as_str())?;

            // Duplicate antecedents collapse; order is kept for explanations.
            let mut seen = HashSet::new();
            let mut antecedents = Vec::with_capacity(def.antecedents.len());
            for antecedent in &def.antecedents {
                let antecedent = known(antecedent.as_str())?;
                if antecedent == consequent {
                    return Err(ConfigurationError::SelfReference {
                        rule: def.id.clone(),
                        fact: antecedent.0,
                    });
                }
                if seen.insert(antecedent.clone()) {
                    antecedents.push(antecedent);
                }
            }

            rules_by_consequent
                .entry(consequent.clone())
                .or_default()
                .push(priority);
            rule_index.insert(id.clone(), priority);
            rules.push(Rule {
                id,
                antecedents,
                consequent,
                confidence: def.confidence,
                description: def.description.clone(),
                priority,
            });
        }

        Ok(Self {
            facts,
            fact_order,
            rules,
            rule_index,
            rules_by_consequent,
        })
    }

    /// All rules whose consequent equals `fact`, in declaration order.
    pub fn rules_concluding(&self, fact: &str) -> Vec<&Rule> {
        self.rules_by_consequent
            .get(fact)
            .map(|positions| positions.iter().map(|&i| &self.rules[i]).collect())
            .unwrap_or_default()
    }

    /// Check if an identifier names a declared fact.
    pub fn is_known_fact(&self, id: &str) -> bool {
        self.facts.contains_key(id)
    }

    /// Get a fact by ID.
    pub fn fact(&self, id: &str) -> Option<&Fact> {
        self.facts.get(id)
    }

    /// Get a rule by ID.
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rule_index.get(id).map(|&i| &self.rules[i])
    }

    /// All rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// All facts in declaration order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.fact_order.iter().filter_map(|id| self.facts.get(id))
    }

    /// Facts of one kind, in declaration order.
    pub fn facts_of_kind(&self, kind: FactKind) -> impl Iterator<Item = &Fact> {
        self.facts().filter(move |fact| fact.kind == kind)
    }

    /// Get the total number of known facts.
    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Get the total number of rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl TryFrom<&RuleBook> for KnowledgeBase {
    type Error = ConfigurationError;

    fn try_from(book: &RuleBook) -> Result<Self, Self::Error> {
        Self::from_rule_book(book)
    }
}
