//! Validated rules - IF all antecedents THEN consequent, with a confidence.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

use super::FactId;

/// Identifier of a rule, e.g. `R001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rule that passed knowledge base validation.
///
/// Antecedents are non-empty, free of duplicates, and never contain the
/// consequent. `priority` is the declaration index; lower wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub antecedents: Vec<FactId>,
    pub consequent: FactId,
    pub confidence: f64,
    pub description: String,
    pub priority: usize,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let antecedents: Vec<_> = self.antecedents.iter().map(FactId::as_str).collect();
        write!(
            f,
            "Rule {}: IF {} THEN {} ({:.2})",
            self.id,
            antecedents.join(" AND "),
            self.consequent,
            self.confidence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cold_rule() -> Rule {
        Rule {
            id: RuleId::new("R001"),
            antecedents: vec![FactId::new("runny_nose"), FactId::new("sneezing")],
            consequent: FactId::new("common_cold"),
            confidence: 0.85,
            description: "Cold symptoms".to_string(),
            priority: 0,
        }
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(
            cold_rule().to_string(),
            "Rule R001: IF runny_nose AND sneezing THEN common_cold (0.85)"
        );
    }
}
