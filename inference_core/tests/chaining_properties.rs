//! Properties both chaining strategies must hold over the medical dataset.

use inference_core::{
    BackwardChainer, DiagnosisEngine, ExplanationBuilder, FactId, ForwardChainer, InferenceError,
    KnowledgeBase, UnknownFactError,
};
use medical_rules::{FactDef, RuleBook, RuleDef};
use std::collections::HashSet;

const SYMPTOM_SETS: &[&[&str]] = &[
    &["runny_nose", "sneezing", "sore_throat"],
    &["fever", "headache", "body_ache", "shortness_of_breath"],
    &["fever", "dry_cough", "loss_of_taste"],
    &["runny_nose", "sneezing", "itchy_eyes"],
    &["severe_headache", "nausea", "light_sensitivity"],
    &["fever", "shortness_of_breath", "chest_pain", "headache", "body_ache"],
    &["sore_throat", "fever", "swollen_lymph_nodes"],
    &[],
];

fn engine() -> DiagnosisEngine {
    DiagnosisEngine::medical().unwrap()
}

fn all_symptoms(kb: &KnowledgeBase) -> Vec<String> {
    kb.facts()
        .filter(|fact| fact.is_symptom())
        .map(|fact| fact.id.to_string())
        .collect()
}

#[test]
fn test_scenario_common_cold() {
    let result = engine()
        .run_forward_chaining(["runny_nose", "sneezing", "sore_throat"])
        .unwrap();

    assert!((result.confidence("common_cold").unwrap() - 0.85).abs() < 1e-9);
    assert!((result.confidence("rest").unwrap() - 0.85 * 0.90).abs() < 1e-9);
    assert_eq!(result.chain.len(), 2);
}

#[test]
fn test_scenario_migraine_proof() {
    let result = engine()
        .run_backward_chaining(["severe_headache", "nausea", "light_sensitivity"], "migraine")
        .unwrap();

    assert!(result.proven);
    assert!((result.confidence.unwrap() - 0.90).abs() < 1e-9);

    let chain = result.proof_chain.unwrap();
    let facts: Vec<_> = chain.nodes().iter().map(|node| node.fact.as_str()).collect();
    assert_eq!(facts, vec!["migraine", "severe_headache", "nausea", "light_sensitivity"]);
    assert_eq!(chain.goal().unwrap().rule_id.as_ref().unwrap().as_str(), "R005");
    assert_eq!(chain.leaves().count(), 3);
}

#[test]
fn test_scenario_empty_symptoms() {
    let result = engine().run_forward_chaining(Vec::<String>::new()).unwrap();

    assert!(result.derived_facts.is_empty());
    assert!(result.chain.is_empty());
    assert!(result.notices.is_empty());
}

#[test]
fn test_scenario_unknown_symptom() {
    let result = engine()
        .run_forward_chaining(["runny_nose", "purple_tongue", "sneezing"])
        .unwrap();

    assert_eq!(result.notices, vec![UnknownFactError::symptom("purple_tongue")]);
    assert!(result.contains("common_cold"));

    let proof = engine()
        .run_backward_chaining(["runny_nose", "purple_tongue", "sneezing"], "rest")
        .unwrap();
    assert!(proof.proven);
    assert_eq!(proof.notices.len(), 1);
}

#[test]
fn test_unknown_goal() {
    let result = engine().run_backward_chaining(["fever"], "dragon_pox");

    assert_eq!(
        result.unwrap_err(),
        InferenceError::UnknownFact(UnknownFactError::goal("dragon_pox"))
    );
}

#[test]
fn test_forward_chaining_is_deterministic() {
    let engine = engine();
    for symptoms in SYMPTOM_SETS {
        let first = engine.run_forward_chaining(symptoms.iter()).unwrap();
        let second = engine.run_forward_chaining(symptoms.iter()).unwrap();

        assert_eq!(first.derived_facts, second.derived_facts);
        assert_eq!(first.chain, second.chain);
        assert_ne!(first.query_id, second.query_id);
    }
}

#[test]
fn test_fixed_point_derives_nothing_new() {
    let engine = engine();
    for symptoms in SYMPTOM_SETS {
        let result = engine.run_forward_chaining(symptoms.iter()).unwrap();
        let again = engine
            .run_forward_chaining(result.derived_facts.keys().map(FactId::as_str))
            .unwrap();

        assert!(again.chain.is_empty(), "rerun of {:?} fired rules", symptoms);
        assert_eq!(
            again.derived_facts.keys().collect::<Vec<_>>(),
            result.derived_facts.keys().collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_inputs_survive_at_full_confidence() {
    let engine = engine();
    for symptoms in SYMPTOM_SETS {
        let result = engine.run_forward_chaining(symptoms.iter()).unwrap();
        for symptom in symptoms.iter() {
            assert_eq!(result.confidence(symptom), Some(1.0));
        }
    }
}

#[test]
fn test_more_symptoms_never_lose_facts() {
    let engine = engine();
    let everything = all_symptoms(engine.knowledge_base());
    let full = engine.run_forward_chaining(&everything).unwrap();

    for symptoms in SYMPTOM_SETS {
        let partial = engine.run_forward_chaining(symptoms.iter()).unwrap();
        for (fact, confidence) in &partial.derived_facts {
            let widened = full.confidence(fact.as_str());
            assert!(widened.is_some(), "{} lost with more symptoms", fact);
            assert!(widened >= Some(*confidence), "{} weakened with more symptoms", fact);
        }
    }
}

#[test]
fn test_pass_bound() {
    let engine = engine();
    let everything = all_symptoms(engine.knowledge_base());
    let fact_count = engine.knowledge_base().fact_count();

    let full = engine.run_forward_chaining(&everything).unwrap();
    assert!(full.passes <= fact_count);

    for symptoms in SYMPTOM_SETS {
        let result = engine.run_forward_chaining(symptoms.iter()).unwrap();
        assert!(result.passes <= fact_count);
        assert!(result.passes <= result.chain.len());
    }
}

#[test]
fn test_pass_bound_on_empty_knowledge_base() {
    let kb = KnowledgeBase::from_rule_book(&RuleBook::new()).unwrap();
    let result = ForwardChainer::with_defaults(&kb)
        .run(Vec::<String>::new())
        .unwrap();

    assert!(result.passes <= kb.fact_count());
}

#[test]
fn test_confidences_stay_in_unit_interval() {
    let engine = engine();
    let everything = all_symptoms(engine.knowledge_base());
    let full = engine.run_forward_chaining(&everything).unwrap();

    for (fact, confidence) in &full.derived_facts {
        assert!(*confidence > 0.0 && *confidence <= 1.0, "{} = {}", fact, confidence);
    }
    for event in &full.chain {
        assert!(event.resulting_confidence <= event.confidence_before_combination);
        assert!(event.resulting_confidence <= event.rule_confidence);
    }
}

#[test]
fn test_forward_and_backward_agree() {
    let engine = engine();
    let kb = engine.knowledge_base();

    let mut sets: Vec<Vec<String>> = SYMPTOM_SETS
        .iter()
        .map(|set| set.iter().map(|s| s.to_string()).collect())
        .collect();
    sets.push(all_symptoms(kb));

    for symptoms in &sets {
        let forward = engine.run_forward_chaining(symptoms).unwrap();
        for fact in kb.facts() {
            let backward = engine
                .run_backward_chaining(symptoms, fact.id.as_str())
                .unwrap();

            assert_eq!(
                forward.contains(fact.id.as_str()),
                backward.proven,
                "{} from {:?}",
                fact.id,
                symptoms
            );
            if let (Some(f), Some(b)) = (forward.confidence(fact.id.as_str()), backward.confidence) {
                assert!((f - b).abs() < 1e-9, "{}: forward {} backward {}", fact.id, f, b);
            }
        }
    }
}

/// Check every fact of `book` against both chainers for the given inputs.
fn assert_chainers_agree(book: &RuleBook, inputs: &[&str]) {
    let kb = KnowledgeBase::from_rule_book(book).unwrap();
    let forward = ForwardChainer::with_defaults(&kb).run(inputs).unwrap();

    for fact in kb.facts() {
        let backward = BackwardChainer::with_defaults(&kb)
            .prove(inputs, fact.id.as_str())
            .unwrap();
        let forward_confidence = forward.confidence(fact.id.as_str());

        assert_eq!(forward_confidence.is_some(), backward.proven, "{}", fact.id);
        if let (Some(f), Some(b)) = (forward_confidence, backward.confidence) {
            assert!((f - b).abs() < 1e-9, "{}: forward {} backward {}", fact.id, f, b);
        }
    }
}

#[test]
fn test_agreement_when_stronger_rule_needs_a_derived_fact() {
    let book = RuleBook::new()
        .with_facts([
            FactDef::symptom("a"),
            FactDef::diagnosis("b"),
            FactDef::diagnosis("c"),
        ])
        .with_rule(RuleDef::new("R1", ["b"], "c", 0.9))
        .with_rule(RuleDef::new("R2", ["a"], "c", 0.5))
        .with_rule(RuleDef::new("R3", ["a"], "b", 0.9));

    assert_chainers_agree(&book, &["a"]);

    let kb = KnowledgeBase::from_rule_book(&book).unwrap();
    let forward = ForwardChainer::with_defaults(&kb).run(["a"]).unwrap();
    assert!((forward.confidence("c").unwrap() - 0.81).abs() < 1e-9);
}

#[test]
fn test_agreement_with_weaker_rule_declared_first() {
    let book = RuleBook::new()
        .with_facts([
            FactDef::symptom("fever"),
            FactDef::symptom("cough"),
            FactDef::diagnosis("flu"),
            FactDef::recommendation("rest"),
        ])
        .with_rule(RuleDef::new("WEAK", ["fever"], "flu", 0.4))
        .with_rule(RuleDef::new("STRONG", ["fever", "cough"], "flu", 0.9))
        .with_rule(RuleDef::new("REST", ["flu"], "rest", 0.9));

    assert_chainers_agree(&book, &["fever"]);
    assert_chainers_agree(&book, &["fever", "cough"]);
}

#[test]
fn test_agreement_with_mutually_recursive_rules() {
    // b and c can each be derived from the other or from a directly.
    let book = RuleBook::new()
        .with_facts([
            FactDef::symptom("a"),
            FactDef::diagnosis("b"),
            FactDef::diagnosis("c"),
            FactDef::recommendation("d"),
        ])
        .with_rule(RuleDef::new("R1", ["b"], "c", 0.9))
        .with_rule(RuleDef::new("R2", ["a"], "c", 0.5))
        .with_rule(RuleDef::new("R3", ["c"], "b", 0.9))
        .with_rule(RuleDef::new("R4", ["a"], "b", 0.6))
        .with_rule(RuleDef::new("R5", ["b", "c"], "d", 1.0));

    assert_chainers_agree(&book, &["a"]);
    assert_chainers_agree(&book, &[]);
}

#[test]
fn test_pneumonia_prefers_direct_rule() {
    let engine = engine();
    let symptoms = ["fever", "shortness_of_breath", "chest_pain", "headache", "body_ache"];

    let proof = engine.run_backward_chaining(symptoms, "medical_attention").unwrap();
    let chain = proof.proof_chain.unwrap();
    assert_eq!(chain.nodes()[1].fact.as_str(), "pneumonia");
    assert_eq!(chain.nodes()[1].rule_id.as_ref().unwrap().as_str(), "R007");
    assert!((proof.confidence.unwrap() - 0.80 * 0.95).abs() < 1e-9);
}

#[test]
fn test_cycles_terminate() {
    let book = RuleBook::new()
        .with_facts([
            FactDef::symptom("a"),
            FactDef::diagnosis("x"),
            FactDef::diagnosis("y"),
        ])
        .with_rule(RuleDef::new("XY", ["y"], "x", 0.9))
        .with_rule(RuleDef::new("YX", ["x"], "y", 0.9));
    let kb = KnowledgeBase::from_rule_book(&book).unwrap();

    let forward = ForwardChainer::with_defaults(&kb).run(["a"]).unwrap();
    assert!(!forward.contains("x"));
    assert!(!forward.contains("y"));

    let backward = BackwardChainer::with_defaults(&kb).prove(["a"], "x").unwrap();
    assert!(!backward.proven);
    assert!(backward.proof_chain.is_none());
}

#[test]
fn test_explanations_only_mention_chain_facts() {
    let engine = engine();
    let everything = all_symptoms(engine.knowledge_base());
    let result = engine.run_forward_chaining(&everything).unwrap();

    let explanation = engine.explain(&result);
    assert_eq!(explanation.steps.len(), result.chain.len());

    let mentioned: HashSet<&FactId> = result
        .chain
        .iter()
        .flat_map(|event| event.antecedents().chain(std::iter::once(&event.resulting_fact)))
        .collect();
    assert!(explanation.facts().is_subset(&mentioned));

    let attention = ExplanationBuilder::explain_fact(&result, "medical_attention");
    assert!(attention.steps.last().unwrap().contains("rule R015"));
}
