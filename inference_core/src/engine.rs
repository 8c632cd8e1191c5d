//! Diagnosis Engine - the entry points presentation layers call.

use medical_rules::RuleBook;
use tracing::info;

use crate::chaining::{
    BackwardChainResult, BackwardChainer, ChainingConfig, ForwardChainResult, ForwardChainer,
};
use crate::error::{ConfigurationError, InferenceError, LoadError};
use crate::explanation::{ChainRef, Explanation, ExplanationBuilder};
use crate::knowledge_base::KnowledgeBase;

/// Owns a validated knowledge base and answers queries against it.
///
/// Queries take `&self` and build their own working memory, so one engine can
/// serve concurrent callers.
#[derive(Debug, Clone)]
pub struct DiagnosisEngine {
    kb: KnowledgeBase,
    config: ChainingConfig,
}

impl DiagnosisEngine {
    /// Create a new engine over the given knowledge base and configuration.
    pub fn new(kb: KnowledgeBase, config: ChainingConfig) -> Self {
        Self { kb, config }
    }

    /// Create an engine without chaining ceilings.
    pub fn with_defaults(kb: KnowledgeBase) -> Self {
        Self::new(kb, ChainingConfig::default())
    }

    /// Validate a rule book and take its limits as the chaining configuration.
    pub fn from_rule_book(book: &RuleBook) -> Result<Self, ConfigurationError> {
        let kb = KnowledgeBase::from_rule_book(book)?;
        info!(
            facts = kb.fact_count(),
            rules = kb.rule_count(),
            "knowledge base loaded"
        );
        Ok(Self::new(kb, book.limits.into()))
    }

    /// Build an engine over the embedded medical dataset.
    pub fn medical() -> Result<Self, LoadError> {
        let book = RuleBook::medical()?;
        Ok(Self::from_rule_book(&book)?)
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn config(&self) -> ChainingConfig {
        self.config
    }

    /// Derive every fact provable from the given symptoms.
    pub fn run_forward_chaining<I, S>(&self, symptom_ids: I) -> Result<ForwardChainResult, InferenceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let result = ForwardChainer::new(&self.kb, self.config).run(symptom_ids)?;
        info!(
            query = %result.query_id,
            derived = result.chain.len(),
            passes = result.passes,
            dropped = result.notices.len(),
            "forward chaining complete"
        );
        Ok(result)
    }

    /// Try to prove `goal_id` from the given symptoms.
    pub fn run_backward_chaining<I, S>(
        &self,
        symptom_ids: I,
        goal_id: &str,
    ) -> Result<BackwardChainResult, InferenceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let result = BackwardChainer::new(&self.kb, self.config).prove(symptom_ids, goal_id)?;
        info!(
            query = %result.query_id,
            goal = %result.goal,
            proven = result.proven,
            steps = result.trace.len(),
            "backward chaining complete"
        );
        Ok(result)
    }

    /// Explain a forward chain or a backward proof.
    pub fn explain<'a>(&self, chain: impl Into<ChainRef<'a>>) -> Explanation {
        ExplanationBuilder::explain(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medical_engine_forward() {
        let engine = DiagnosisEngine::medical().unwrap();
        let result = engine
            .run_forward_chaining(["runny_nose", "sneezing", "sore_throat"])
            .unwrap();

        assert!((result.confidence("common_cold").unwrap() - 0.85).abs() < 1e-9);
        assert!((result.confidence("rest").unwrap() - 0.765).abs() < 1e-9);
        assert_eq!(result.chain.len(), 2);
    }

    #[test]
    fn test_medical_engine_backward() {
        let engine = DiagnosisEngine::medical().unwrap();
        let result = engine
            .run_backward_chaining(["severe_headache", "nausea", "light_sensitivity"], "migraine")
            .unwrap();

        assert!(result.proven);
        assert_eq!(result.proof_chain.as_ref().unwrap().len(), 4);

        let explanation = engine.explain(&result);
        assert_eq!(explanation.steps.len(), 1);
        assert_eq!(explanation.edges.len(), 3);
    }

    #[test]
    fn test_engine_takes_limits_from_rule_book() {
        let engine = DiagnosisEngine::medical().unwrap();
        assert_eq!(engine.config().max_passes, Some(64));
        assert_eq!(engine.config().max_depth, Some(32));
    }

    #[test]
    fn test_invalid_rule_book() {
        let book = RuleBook::from_toml_str(
            r#"
            [[facts]]
            id = "fever"
            kind = "symptom"

            [[rules]]
            id = "BAD"
            antecedents = []
            consequent = "fever"
            confidence = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(
            DiagnosisEngine::from_rule_book(&book).unwrap_err(),
            ConfigurationError::EmptyAntecedents {
                rule: "BAD".to_string()
            }
        );
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiagnosisEngine>();
    }
}
