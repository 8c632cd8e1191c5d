//! Error types for knowledge base construction and chaining queries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::knowledge_base::FactId;

/// A malformed knowledge base. Raised once, at construction, and never
/// recovered internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// A fact or rule was declared with an empty identifier.
    #[error("{0} identifier must not be empty")]
    EmptyIdentifier(&'static str),

    /// The same fact identifier was declared twice.
    #[error("fact `{id}` is declared more than once")]
    DuplicateFact { id: String },

    /// The same rule identifier was declared twice.
    #[error("rule `{id}` is declared more than once")]
    DuplicateRule { id: String },

    /// A rule with no antecedents would always hold.
    #[error("rule `{rule}` has no antecedents")]
    EmptyAntecedents { rule: String },

    /// A rule references a fact the knowledge base does not declare.
    #[error("rule `{rule}` references unknown fact `{fact}`")]
    UnknownFact { rule: String, fact: String },

    /// A rule concludes one of its own antecedents.
    #[error("rule `{rule}` concludes its own antecedent `{fact}`")]
    SelfReference { rule: String, fact: String },

    /// Rule confidence must lie in `(0, 1]`.
    #[error("rule `{rule}` has confidence {confidence}, expected a value in (0, 1]")]
    InvalidConfidence { rule: String, confidence: f64 },
}

/// Where an unknown identifier was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactRole {
    /// One of the input symptoms.
    Symptom,
    /// The backward-chaining goal.
    Goal,
}

impl std::fmt::Display for FactRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactRole::Symptom => f.write_str("symptom"),
            FactRole::Goal => f.write_str("goal"),
        }
    }
}

/// The caller supplied an identifier the knowledge base does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("unknown {role} `{id}`")]
pub struct UnknownFactError {
    pub id: String,
    pub role: FactRole,
}

impl UnknownFactError {
    /// An input symptom that was dropped from a query.
    pub fn symptom(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: FactRole::Symptom,
        }
    }

    /// A goal that cannot be queried.
    pub fn goal(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: FactRole::Goal,
        }
    }
}

/// Errors a chaining query can return to its caller.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InferenceError {
    #[error(transparent)]
    UnknownFact(#[from] UnknownFactError),

    /// Forward chaining needed more passes than the configured ceiling.
    #[error("forward chaining exceeded the limit of {limit} passes")]
    PassLimitExceeded { limit: usize },

    /// Backward chaining recursed deeper than the configured ceiling.
    #[error("backward chaining exceeded depth {limit} while proving `{goal}`")]
    DepthLimitExceeded { limit: usize, goal: FactId },
}

/// Errors while turning a rule file into a usable engine.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    RuleBook(#[from] medical_rules::RuleBookError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
