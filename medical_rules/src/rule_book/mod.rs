//! Rule book - the static configuration a knowledge base is built from.

mod errors;

pub use errors::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::definitions::{FactDef, FactKind, RuleDef};

/// The medical dataset shipped with the crate.
const EMBEDDED_MEDICAL_RULES: &str = include_str!("../../data/medical.toml");

/// Optional ceilings a caller may impose on a chaining run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum number of forward-chaining passes.
    #[serde(default)]
    pub max_passes: Option<usize>,

    /// Maximum backward-chaining proof depth.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// A complete set of fact and rule definitions.
///
/// Rules keep their declaration order, which the engine uses as priority.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleBook {
    #[serde(default)]
    pub limits: Limits,

    #[serde(default)]
    pub facts: Vec<FactDef>,

    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

impl RuleBook {
    /// Create a new empty rule book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the embedded medical dataset.
    pub fn medical() -> RuleBookResult<Self> {
        Self::from_toml_str(EMBEDDED_MEDICAL_RULES)
    }

    /// Parse a rule book from TOML text.
    pub fn from_toml_str(source: &str) -> RuleBookResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Parse a rule book from JSON text.
    pub fn from_json_str(source: &str) -> RuleBookResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Read a rule book from disk, choosing the decoder by file extension.
    pub fn from_path(path: impl AsRef<Path>) -> RuleBookResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        let read = || {
            std::fs::read_to_string(path).map_err(|source| RuleBookError::Io {
                path: path.to_path_buf(),
                source,
            })
        };

        match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&read()?),
            Some("json") => Self::from_json_str(&read()?),
            _ => Err(RuleBookError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Add a fact definition.
    pub fn with_fact(mut self, fact: FactDef) -> Self {
        self.facts.push(fact);
        self
    }

    /// Add several fact definitions.
    pub fn with_facts(mut self, facts: impl IntoIterator<Item = FactDef>) -> Self {
        self.facts.extend(facts);
        self
    }

    /// Append a rule definition (lowest priority so far).
    pub fn with_rule(mut self, rule: RuleDef) -> Self {
        self.rules.push(rule);
        self
    }

    /// Set the chaining limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Get a fact definition by identifier.
    pub fn fact(&self, id: &str) -> Option<&FactDef> {
        self.facts.iter().find(|fact| fact.id == id)
    }

    /// Get all fact definitions of a kind, in declaration order.
    pub fn facts_of_kind(&self, kind: FactKind) -> impl Iterator<Item = &FactDef> {
        self.facts.iter().filter(move |fact| fact.kind == kind)
    }

    /// Get all symptom definitions, in declaration order.
    pub fn symptoms(&self) -> impl Iterator<Item = &FactDef> {
        self.facts_of_kind(FactKind::Symptom)
    }
}
