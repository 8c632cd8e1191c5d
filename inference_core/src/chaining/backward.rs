//! Backward chaining - depth-first proof search for a single goal.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, debug_span};

use super::{combine_confidence, seed_inputs, weakest_confidence, ChainingConfig};
use crate::error::{InferenceError, UnknownFactError};
use crate::knowledge_base::{FactId, KnowledgeBase, RuleId};
use crate::working_memory::{QueryId, WorkingMemory};

/// One node of a proof chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofNode {
    pub fact: FactId,

    /// The rule that proved this fact, `None` for an input leaf.
    pub rule_id: Option<RuleId>,

    pub confidence: f64,

    /// Distance from the goal, which sits at depth 0.
    pub depth: usize,

    /// Antecedents the rule was proven from (empty for leaves).
    pub antecedents: Vec<FactId>,
}

impl ProofNode {
    /// Check if this node is an input fact.
    pub fn is_leaf(&self) -> bool {
        self.rule_id.is_none()
    }
}

/// One successful derivation, from the goal down to input facts (pre-order).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofChain(pub Vec<ProofNode>);

impl ProofChain {
    /// The proven goal.
    pub fn goal(&self) -> Option<&ProofNode> {
        self.0.first()
    }

    pub fn nodes(&self) -> &[ProofNode] {
        &self.0
    }

    /// Input facts the proof rests on.
    pub fn leaves(&self) -> impl Iterator<Item = &ProofNode> {
        self.0.iter().filter(|node| node.is_leaf())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A structured record of what the search did, in visiting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum SearchStep {
    /// Trying a rule that concludes `goal`.
    ExamineRule { goal: FactId, rule_id: RuleId, depth: usize },
    /// The fact was supplied as input.
    InputMatched { fact: FactId, depth: usize },
    /// The fact is already being proven further up the current path.
    CycleDetected { fact: FactId, depth: usize },
    /// The fact is not an input and no rule concludes it.
    NoRules { fact: FactId, depth: usize },
    /// Every antecedent of the rule was proven.
    RuleSatisfied {
        goal: FactId,
        rule_id: RuleId,
        confidence: f64,
        depth: usize,
    },
    /// The strongest satisfied rule for the fact.
    Proven {
        fact: FactId,
        rule_id: RuleId,
        confidence: f64,
        depth: usize,
    },
    Failed { fact: FactId, depth: usize },
}

impl std::fmt::Display for SearchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStep::ExamineRule { goal, rule_id, depth } => {
                write!(f, "[{}] examine rule {} for {}", depth, rule_id, goal)
            }
            SearchStep::InputMatched { fact, depth } => {
                write!(f, "[{}] {} is a given symptom", depth, fact)
            }
            SearchStep::CycleDetected { fact, depth } => {
                write!(f, "[{}] circular reasoning on {}, branch abandoned", depth, fact)
            }
            SearchStep::NoRules { fact, depth } => {
                write!(f, "[{}] no rule concludes {}", depth, fact)
            }
            SearchStep::RuleSatisfied {
                goal,
                rule_id,
                confidence,
                depth,
            } => write!(
                f,
                "[{}] rule {} holds for {} (confidence {:.2})",
                depth, rule_id, goal, confidence
            ),
            SearchStep::Proven {
                fact,
                rule_id,
                confidence,
                depth,
            } => write!(
                f,
                "[{}] proved {} by rule {} (confidence {:.2})",
                depth, fact, rule_id, confidence
            ),
            SearchStep::Failed { fact, depth } => {
                write!(f, "[{}] could not prove {}", depth, fact)
            }
        }
    }
}

/// Everything a backward-chaining query produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackwardChainResult {
    pub query_id: QueryId,
    pub goal: FactId,
    pub proven: bool,
    pub confidence: Option<f64>,
    pub proof_chain: Option<ProofChain>,

    /// Input identifiers that were dropped.
    pub notices: Vec<UnknownFactError>,

    pub trace: Vec<SearchStep>,
}

/// Proof tree built during the search, flattened into a [`ProofChain`].
struct ProofTree {
    fact: FactId,
    rule_id: Option<RuleId>,
    confidence: f64,
    children: Vec<ProofTree>,
}

impl ProofTree {
    fn flatten_into(self, depth: usize, nodes: &mut Vec<ProofNode>) {
        nodes.push(ProofNode {
            fact: self.fact,
            rule_id: self.rule_id,
            confidence: self.confidence,
            depth,
            antecedents: self.children.iter().map(|c| c.fact.clone()).collect(),
        });
        for child in self.children {
            child.flatten_into(depth + 1, nodes);
        }
    }
}

/// Proves one goal against a knowledge base and a set of input facts.
pub struct BackwardChainer<'kb> {
    kb: &'kb KnowledgeBase,
    config: ChainingConfig,
}

impl<'kb> BackwardChainer<'kb> {
    /// Create a new backward chainer with the given configuration.
    pub fn new(kb: &'kb KnowledgeBase, config: ChainingConfig) -> Self {
        Self { kb, config }
    }

    /// Create a backward chainer without depth ceiling.
    pub fn with_defaults(kb: &'kb KnowledgeBase) -> Self {
        Self::new(kb, ChainingConfig::default())
    }

    /// Try to prove `goal` from the given input facts.
    ///
    /// # Algorithm
    ///
    /// 1. A goal that is an input holds with confidence 1.0
    /// 2. Otherwise try each rule concluding the goal in declaration order,
    ///    proving every antecedent as a sub-goal
    /// 3. Of the rules whose antecedents all hold, the one with the highest
    ///    combined confidence proves the goal (ties go to the earlier rule)
    ///
    /// A sub-goal already on the current root-to-leaf path fails that branch,
    /// and a sub-goal with no concluding rules fails without recursion.
    pub fn prove<I, S>(&self, inputs: I, goal: &str) -> Result<BackwardChainResult, InferenceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.kb.is_known_fact(goal) {
            return Err(UnknownFactError::goal(goal).into());
        }

        let mut memory = WorkingMemory::new();
        let query_id = memory.query_id();
        let notices = seed_inputs(self.kb, &mut memory, inputs);

        let span = debug_span!("backward_chaining", query = %query_id, goal);
        let _enter = span.enter();

        let goal = FactId::new(goal);
        let mut search = ProofSearch {
            kb: self.kb,
            memory: &memory,
            max_depth: self.config.max_depth,
            path: HashSet::new(),
            trace: Vec::new(),
        };
        let tree = search.prove_goal(&goal, 0)?;
        let trace = search.trace;

        let (confidence, proof_chain) = match tree {
            Some(tree) => {
                let confidence = tree.confidence;
                let mut nodes = Vec::new();
                tree.flatten_into(0, &mut nodes);
                (Some(confidence), Some(ProofChain(nodes)))
            }
            None => (None, None),
        };

        Ok(BackwardChainResult {
            query_id,
            goal,
            proven: proof_chain.is_some(),
            confidence,
            proof_chain,
            notices,
            trace,
        })
    }
}

/// State of one proof search. `path` holds the goals being expanded on the
/// current root-to-leaf path only.
struct ProofSearch<'a> {
    kb: &'a KnowledgeBase,
    memory: &'a WorkingMemory,
    max_depth: Option<usize>,
    path: HashSet<FactId>,
    trace: Vec<SearchStep>,
}

impl ProofSearch<'_> {
    fn prove_goal(&mut self, goal: &FactId, depth: usize) -> Result<Option<ProofTree>, InferenceError> {
        if let Some(limit) = self.max_depth {
            if depth > limit {
                return Err(InferenceError::DepthLimitExceeded {
                    limit,
                    goal: goal.clone(),
                });
            }
        }

        if let Some(confidence) = self.memory.confidence(goal.as_str()) {
            self.trace.push(SearchStep::InputMatched {
                fact: goal.clone(),
                depth,
            });
            return Ok(Some(ProofTree {
                fact: goal.clone(),
                rule_id: None,
                confidence,
                children: Vec::new(),
            }));
        }

        let rules = self.kb.rules_concluding(goal.as_str());
        if rules.is_empty() {
            self.trace.push(SearchStep::NoRules {
                fact: goal.clone(),
                depth,
            });
            return Ok(None);
        }

        self.path.insert(goal.clone());
        let mut proof: Option<ProofTree> = None;

        'rules: for rule in rules {
            // A rule can never conclude more than its own confidence.
            if proof.as_ref().is_some_and(|best| rule.confidence <= best.confidence) {
                continue;
            }
            self.trace.push(SearchStep::ExamineRule {
                goal: goal.clone(),
                rule_id: rule.id.clone(),
                depth,
            });

            let mut children = Vec::with_capacity(rule.antecedents.len());
            for antecedent in &rule.antecedents {
                if self.path.contains(antecedent) {
                    self.trace.push(SearchStep::CycleDetected {
                        fact: antecedent.clone(),
                        depth: depth + 1,
                    });
                    continue 'rules;
                }
                if !self.memory.is_asserted(antecedent.as_str())
                    && self.kb.rules_concluding(antecedent.as_str()).is_empty()
                {
                    self.trace.push(SearchStep::NoRules {
                        fact: antecedent.clone(),
                        depth: depth + 1,
                    });
                    continue 'rules;
                }
                match self.prove_goal(antecedent, depth + 1)? {
                    Some(child) => children.push(child),
                    None => continue 'rules,
                }
            }

            let Some(weakest) = weakest_confidence(children.iter().map(|c| c.confidence)) else {
                continue;
            };
            let confidence = combine_confidence(rule.confidence, weakest);
            self.trace.push(SearchStep::RuleSatisfied {
                goal: goal.clone(),
                rule_id: rule.id.clone(),
                confidence,
                depth,
            });

            if proof.as_ref().map_or(true, |best| confidence > best.confidence) {
                proof = Some(ProofTree {
                    fact: goal.clone(),
                    rule_id: Some(rule.id.clone()),
                    confidence,
                    children,
                });
            }
        }

        if let Some(tree) = &proof {
            if let Some(rule_id) = &tree.rule_id {
                debug!(fact = %goal, rule = %rule_id, depth, confidence = tree.confidence, "goal proven");
                self.trace.push(SearchStep::Proven {
                    fact: goal.clone(),
                    rule_id: rule_id.clone(),
                    confidence: tree.confidence,
                    depth,
                });
            }
        }

        self.path.remove(goal);

        if proof.is_none() {
            debug!(fact = %goal, depth, "goal not provable");
            self.trace.push(SearchStep::Failed {
                fact: goal.clone(),
                depth,
            });
        }
        Ok(proof)
    }
}
