//! Rule definitions - IF antecedents THEN consequent records.

use serde::{Deserialize, Serialize};

/// A rule record as it appears in a rule book.
///
/// Antecedents are conjunctive: every one must hold for the rule to fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDef {
    pub id: String,
    pub antecedents: Vec<String>,
    pub consequent: String,

    /// Strength of the rule, expected in `(0, 1]`.
    pub confidence: f64,

    #[serde(default)]
    pub description: String,
}

impl RuleDef {
    /// Create a new rule definition.
    pub fn new<I, S>(
        id: impl Into<String>,
        antecedents: I,
        consequent: impl Into<String>,
        confidence: f64,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            antecedents: antecedents.into_iter().map(Into::into).collect(),
            consequent: consequent.into(),
            confidence,
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
