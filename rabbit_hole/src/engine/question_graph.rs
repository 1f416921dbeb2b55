//! The question variant: eras of questions whose technologies open
//! follow-up topics.

use era_content::{Choice, ComponentId, Era, Question};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Candidate, ContentGraph, ScoringStrategy};
use crate::coherence::{self, CoherenceStrategy};
use crate::config::{SessionConfig, CORRECTNESS_THRESHOLD};
use crate::error::{EngineError, EngineResult};
use crate::session::{AnsweredQuestion, Assessment, SessionState};

/// Points for a correct answer at depth 0, before coherence weighting.
pub const BASE_POINTS: f64 = 10.0;
/// Extra points per depth level.
pub const DEPTH_BONUS: f64 = 5.0;

/// A node of the question graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionNode {
    /// Index into the era's core questions.
    Core(usize),
    /// Follow-up question about a recipe component.
    Topic(ComponentId),
}

/// An era walked as a question graph.
#[derive(Debug, Clone)]
pub struct QuestionGraph {
    era: Era,
}

impl QuestionGraph {
    pub fn new(era: Era) -> Self {
        Self { era }
    }

    pub fn era(&self) -> &Era {
        &self.era
    }

    pub fn question(&self, node: &QuestionNode) -> EngineResult<&Question> {
        match node {
            QuestionNode::Core(index) => self.era.question(*index).ok_or_else(|| {
                EngineError::MissingContent(format!(
                    "era '{}' has no core question {}",
                    self.era.name, index
                ))
            }),
            QuestionNode::Topic(component) => self.era.topic(component).ok_or_else(|| {
                EngineError::MissingContent(format!(
                    "era '{}' has no follow-up question about '{}'",
                    self.era.name, component
                ))
            }),
        }
    }
}

impl ContentGraph for QuestionGraph {
    type Node = QuestionNode;
    type Choice = Choice;

    /// Core questions are drawn independently, so one can come up twice.
    fn core_nodes<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> EngineResult<Vec<QuestionNode>> {
        (0..count)
            .map(|_| {
                self.era
                    .random_question_index(rng)
                    .map(QuestionNode::Core)
                    .map_err(EngineError::from)
            })
            .collect()
    }

    fn prompt(&self, node: &QuestionNode) -> EngineResult<String> {
        Ok(self.question(node)?.text())
    }

    fn candidates<R: Rng + ?Sized>(
        &self,
        node: &QuestionNode,
        _depth: u32,
        _rng: &mut R,
    ) -> EngineResult<Vec<Candidate<Choice>>> {
        Ok(self
            .question(node)?
            .choices
            .iter()
            .map(|choice| Candidate::new(choice.text(), choice.clone()))
            .collect())
    }

    fn is_core(&self, node: &QuestionNode) -> bool {
        matches!(node, QuestionNode::Core(_))
    }

    fn followups(
        &self,
        _node: &QuestionNode,
        choice: &Choice,
        _session: &mut SessionState,
    ) -> Vec<QuestionNode> {
        choice
            .answer
            .recipe_components()
            .into_iter()
            .map(QuestionNode::Topic)
            .collect()
    }
}

/// Coherence-weighted scoring of the question variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoherenceScoring;

impl ScoringStrategy for CoherenceScoring {
    type Choice = Choice;

    fn name(&self) -> &'static str {
        "coherence"
    }

    fn score(&self, choice: &Choice, config: &SessionConfig) -> f64 {
        coherence::evaluate(choice, config)
    }

    fn is_correct(&self, choice: &Choice) -> bool {
        choice.environmental_coherence() >= CORRECTNESS_THRESHOLD
    }

    fn assess(&self, choice: &Choice, _depth: u32, _core: bool) -> Assessment {
        Assessment::Knowledge {
            environmental: choice.environmental_coherence(),
            combined: choice.coherence(),
            impact: choice.impact_score(),
        }
    }

    fn feedback(&self, choice: &Choice, correct: bool) -> String {
        if correct {
            choice.success_response().to_string()
        } else {
            choice.failure_response().to_string()
        }
    }

    /// `(10 + 5 * depth) * coherence`, whether or not the answer was correct.
    fn points(&self, answer: &AnsweredQuestion, config: &SessionConfig) -> f64 {
        match answer.assessment {
            Assessment::Knowledge {
                environmental,
                combined,
                ..
            } => {
                let weight = CoherenceStrategy::from_config(config).select(environmental, combined);
                (BASE_POINTS + DEPTH_BONUS * answer.depth as f64) * weight
            }
            Assessment::Crafting { points, .. } => points,
        }
    }
}
