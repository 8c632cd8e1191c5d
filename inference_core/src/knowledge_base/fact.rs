//! Fact identifiers and their definitions inside a knowledge base.

use medical_rules::{FactDef, FactKind};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Canonical identifier of a fact, e.g. `runny_nose` or `common_cold`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(pub String);

impl FactId {
    /// Create a fact ID from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FactId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FactId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FactId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for FactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A known fact: an immutable identifier tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,
    pub kind: FactKind,
    pub description: String,
}

impl Fact {
    /// Check if this fact is a symptom.
    pub fn is_symptom(&self) -> bool {
        self.kind == FactKind::Symptom
    }
}

impl From<&FactDef> for Fact {
    fn from(def: &FactDef) -> Self {
        Self {
            id: FactId::new(def.id.as_str()),
            kind: def.kind,
            description: def.description.clone(),
        }
    }
}
