//! Chaining - forward (data-driven) and backward (goal-driven) inference.
//!
//! Both strategies share one confidence rule:
//!
//! ```text
//! derived = rule.confidence × min(antecedent confidences)
//! ```
//!
//! The result never exceeds the weakest contributing fact and never leaves
//! `(0, 1]` when its inputs are in `(0, 1]`. Both strategies also share the
//! conflict policy: of the rules that can establish a fact, the one giving the
//! highest confidence decides it, and ties go to the earlier rule. Forward and
//! backward chaining therefore agree on every fact's confidence.

mod backward;
mod forward;

pub use backward::*;
pub use forward::*;

use medical_rules::Limits;
use tracing::warn;

use crate::error::UnknownFactError;
use crate::knowledge_base::{FactId, KnowledgeBase};
use crate::working_memory::WorkingMemory;

/// Ceilings a caller may impose on a chaining run.
///
/// A valid knowledge base always terminates on its own; these only guard
/// against misconfigured rule files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainingConfig {
    /// Maximum number of forward-chaining passes.
    pub max_passes: Option<usize>,

    /// Maximum backward-chaining recursion depth (the goal is depth 0).
    pub max_depth: Option<usize>,
}

impl From<Limits> for ChainingConfig {
    fn from(limits: Limits) -> Self {
        Self {
            max_passes: limits.max_passes,
            max_depth: limits.max_depth,
        }
    }
}

/// The weakest of a set of confidences, or `None` for an empty set.
pub fn weakest_confidence(confidences: impl IntoIterator<Item = f64>) -> Option<f64> {
    confidences.into_iter().reduce(f64::min)
}

/// Combine a rule's confidence with its weakest antecedent.
pub fn combine_confidence(rule_confidence: f64, weakest_antecedent: f64) -> f64 {
    rule_confidence * weakest_antecedent
}

/// Seed working memory with the caller's input facts.
///
/// Unknown identifiers are dropped and returned as notices so the run can
/// continue with the remaining valid inputs.
pub(crate) fn seed_inputs<I, S>(
    kb: &KnowledgeBase,
    memory: &mut WorkingMemory,
    inputs: I,
) -> Vec<UnknownFactError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut notices = Vec::new();

    for input in inputs {
        let id = input.as_ref();
        if kb.is_known_fact(id) {
            memory.seed(FactId::new(id));
        } else {
            warn!(query = %memory.query_id(), symptom = id, "dropping unknown symptom");
            let notice = UnknownFactError::symptom(id);
            if !notices.contains(&notice) {
                notices.push(notice);
            }
        }
    }

    notices
}
