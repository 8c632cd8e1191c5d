//! Fact definitions - the identifiers a rule book declares.

use serde::{Deserialize, Serialize};

use super::FactKind;

/// A declared fact identifier with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactDef {
    /// Canonical identifier, e.g. `runny_nose`.
    pub id: String,

    pub kind: FactKind,

    /// Human-readable description shown by front ends.
    #[serde(default)]
    pub description: String,
}

impl FactDef {
    /// Create a new fact definition with an empty description.
    pub fn new(id: impl Into<String>, kind: FactKind) -> Self {
        Self {
            id: id.into(),
            kind,
            description: String::new(),
        }
    }

    /// Create a symptom definition.
    pub fn symptom(id: impl Into<String>) -> Self {
        Self::new(id, FactKind::Symptom)
    }

    /// Create a diagnosis definition.
    pub fn diagnosis(id: impl Into<String>) -> Self {
        Self::new(id, FactKind::Diagnosis)
    }

    /// Create a recommendation definition.
    pub fn recommendation(id: impl Into<String>) -> Self {
        Self::new(id, FactKind::Recommendation)
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_def_constructors() {
        let fever = FactDef::symptom("fever").with_description("High temperature");
        assert_eq!(fever.id, "fever");
        assert_eq!(fever.kind, FactKind::Symptom);
        assert_eq!(fever.description, "High temperature");

        assert_eq!(FactDef::diagnosis("flu").kind, FactKind::Diagnosis);
        assert_eq!(FactDef::recommendation("rest").kind, FactKind::Recommendation);
    }

    #[test]
    fn test_description_defaults_to_empty() {
        let fact: FactDef = serde_json::from_str(r#"{"id": "nausea", "kind": "symptom"}"#).unwrap();
        assert_eq!(fact.id, "nausea");
        assert!(fact.description.is_empty());
    }
}
