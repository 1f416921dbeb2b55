//! The crafting variant: build a technology by picking recipes, then build
//! whatever those recipes need, one pending target at a time.
//!
//! A correct core answer fills the target queue. Every correct recipe marks
//! its technology solved and queues its own craftable components ahead of
//! the rest, so the tree is walked depth-first. Decoy herrings are offered
//! only when they look plausible enough for the current depth.

use era_content::{
    completion_message, failure_message, success_quip, ComponentId, CraftingBook, CraftingEra,
    CraftingQuestion, TechNode,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Candidate, ContentGraph, ScoringStrategy};
use crate::config::SessionConfig;
use crate::error::{EngineError, EngineResult};
use crate::session::{AnsweredQuestion, Assessment, SessionState};
use crate::threshold::{plausibility_floor, THRESHOLD_EPSILON};

/// Plausibility assumed for a wrong core answer that does not declare one.
pub const DEFAULT_PLAUSIBILITY: f64 = 0.5;

/// Shown when the session ends because enough core questions were answered.
pub const SESSION_CAP_MESSAGE: &str = "You've answered enough questions to change history! \
    Your futuristic knowledge has left its mark on this era.";

/// A node of the crafting graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CraftNode {
    /// Index into the crafting era's core questions.
    Core(usize),
    /// A technology to build.
    Tech(ComponentId),
}

/// One crafting option, already rendered for the current node.
#[derive(Debug, Clone, PartialEq)]
pub struct CraftOption {
    pub valid: bool,
    /// Set for wrong answers.
    pub plausibility: Option<f64>,
    /// Crafting targets of a core answer, or the components of a recipe.
    pub targets: Vec<ComponentId>,
    pub success_text: String,
    pub failure_text: String,
}

impl CraftOption {
    fn valid(targets: Vec<ComponentId>, success_text: String) -> Self {
        Self {
            valid: true,
            plausibility: None,
            targets,
            success_text,
            failure_text: String::new(),
        }
    }

    fn invalid(plausibility: f64, failure_text: String) -> Self {
        Self {
            valid: false,
            plausibility: Some(plausibility),
            targets: Vec::new(),
            success_text: String::new(),
            failure_text,
        }
    }
}

/// A crafting era walked together with its crafting book.
#[derive(Debug, Clone)]
pub struct CraftingGraph {
    era: CraftingEra,
    book: CraftingBook,
}

impl CraftingGraph {
    pub fn new(era: CraftingEra, book: CraftingBook) -> Self {
        Self { era, book }
    }

    pub fn era(&self) -> &CraftingEra {
        &self.era
    }

    pub fn book(&self) -> &CraftingBook {
        &self.book
    }

    /// Closing line for a finished session.
    pub fn outcome_message(&self, session: &SessionState, config: &SessionConfig) -> &'static str {
        if self.session_cap_reached(session, config) {
            SESSION_CAP_MESSAGE
        } else {
            completion_message(session.depth())
        }
    }

    fn core_question(&self, index: usize) -> EngineResult<&CraftingQuestion> {
        self.era.question(index).ok_or_else(|| {
            EngineError::MissingContent(format!(
                "crafting era '{}' has no core question {}",
                self.era.name, index
            ))
        })
    }

    fn tech(&self, id: &ComponentId) -> EngineResult<&TechNode> {
        self.book
            .get(id)
            .ok_or_else(|| EngineError::MissingContent(format!("unknown technology '{}'", id)))
    }

    /// Pop pending targets until one that is not built yet comes up.
    fn next_unsolved(session: &mut SessionState) -> Option<ComponentId> {
        while let Some(next) = session.next_target() {
            if !session.is_solved(&next) {
                return Some(next);
            }
        }
        None
    }
}

impl ContentGraph for CraftingGraph {
    type Node = CraftNode;
    type Choice = CraftOption;

    fn core_nodes<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> EngineResult<Vec<CraftNode>> {
        (0..count)
            .map(|_| {
                self.era
                    .random_question_index(rng)
                    .map(CraftNode::Core)
                    .map_err(EngineError::from)
            })
            .collect()
    }

    fn prompt(&self, node: &CraftNode) -> EngineResult<String> {
        match node {
            CraftNode::Core(index) => Ok(self.core_question(*index)?.text.clone()),
            CraftNode::Tech(id) => Ok(format!("How would you build a {}?", self.tech(id)?.name)),
        }
    }

    fn candidates<R: Rng + ?Sized>(
        &self,
        node: &CraftNode,
        depth: u32,
        rng: &mut R,
    ) -> EngineResult<Vec<Candidate<CraftOption>>> {
        match node {
            CraftNode::Core(index) => {
                let question = self.core_question(*index)?;
                Ok(question
                    .choices
                    .iter()
                    .map(|choice| {
                        let option = if choice.correct {
                            CraftOption::valid(
                                choice.crafting_targets.clone(),
                                choice.feedback.clone().unwrap_or_default(),
                            )
                        } else {
                            let plausibility = choice.plausibility.unwrap_or(DEFAULT_PLAUSIBILITY);
                            let failure = choice.feedback.clone().unwrap_or_else(|| {
                                failure_message(&choice.text, plausibility, rng)
                            });
                            CraftOption::invalid(plausibility, failure)
                        };
                        Candidate::new(choice.text.clone(), option)
                    })
                    .collect())
            }
            CraftNode::Tech(id) => {
                let tech = self.tech(id)?;
                let mut candidates = Vec::new();

                for recipe in &tech.recipes {
                    let success = format!(
                        "Success! You've created a {}. {}",
                        tech.name,
                        success_quip(depth, rng)
                    );
                    candidates.push(Candidate::new(
                        self.book.recipe_label(recipe),
                        CraftOption::valid(recipe.components.clone(), success),
                    ));
                }

                let floor = plausibility_floor(depth);
                for herring in tech.herrings_at_least(floor - THRESHOLD_EPSILON) {
                    let label = self.book.recipe_label(&herring.recipe);
                    let failure = herring
                        .feedback
                        .clone()
                        .unwrap_or_else(|| failure_message(&label, herring.plausibility, rng));
                    candidates.push(Candidate::new(
                        label,
                        CraftOption::invalid(herring.plausibility, failure),
                    ));
                }

                Ok(candidates)
            }
        }
    }

    fn is_core(&self, node: &CraftNode) -> bool {
        matches!(node, CraftNode::Core(_))
    }

    /// Only building a technology goes deeper; picking what to build does not.
    fn advances_depth(&self, node: &CraftNode) -> bool {
        matches!(node, CraftNode::Tech(_))
    }

    fn child_depth(&self, _depth: u32, session: &SessionState) -> u32 {
        session.depth()
    }

    fn session_cap_reached(&self, session: &SessionState, config: &SessionConfig) -> bool {
        config.exit_mid_rabbit_hole && session.core_answered() >= config.num_core_questions
    }

    fn followups(
        &self,
        node: &CraftNode,
        choice: &CraftOption,
        session: &mut SessionState,
    ) -> Vec<CraftNode> {
        if !choice.valid {
            return Vec::new();
        }

        match node {
            CraftNode::Core(_) => session.replace_unsolved(choice.targets.iter().cloned()),
            CraftNode::Tech(id) => {
                session.mark_solved(id.clone());

                let mut fresh: Vec<ComponentId> = Vec::new();
                for component in &choice.targets {
                    if self.book.contains(component)
                        && !session.is_solved(component)
                        && !session.is_pending(component)
                        && !fresh.contains(component)
                    {
                        fresh.push(component.clone());
                    }
                }
                session.push_unsolved_front(fresh);
            }
        }

        Self::next_unsolved(session)
            .map(CraftNode::Tech)
            .into_iter()
            .collect()
    }
}

/// Flat crafting scoring: 1 point for a correct core answer, `2 * (d + 1)`
/// for a correct recipe at depth `d`, nothing for a wrong answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CraftingScoring;

impl CraftingScoring {
    pub fn points_for(valid: bool, depth: u32, core: bool) -> f64 {
        match (valid, core) {
            (false, _) => 0.0,
            (true, true) => 1.0,
            (true, false) => 2.0 * (depth as f64 + 1.0),
        }
    }
}

impl ScoringStrategy for CraftingScoring {
    type Choice = CraftOption;

    fn name(&self) -> &'static str {
        "crafting"
    }

    fn score(&self, choice: &CraftOption, _config: &SessionConfig) -> f64 {
        if choice.valid {
            1.0
        } else {
            0.0
        }
    }

    fn is_correct(&self, choice: &CraftOption) -> bool {
        choice.valid
    }

    fn assess(&self, choice: &CraftOption, depth: u32, core: bool) -> Assessment {
        Assessment::Crafting {
            valid: choice.valid,
            plausibility: choice.plausibility,
            points: Self::points_for(choice.valid, depth, core),
        }
    }

    fn feedback(&self, choice: &CraftOption, correct: bool) -> String {
        if correct {
            choice.success_text.clone()
        } else {
            choice.failure_text.clone()
        }
    }

    fn points(&self, answer: &AnsweredQuestion, _config: &SessionConfig) -> f64 {
        match answer.assessment {
            Assessment::Crafting { points, .. } => points,
            Assessment::Knowledge { .. } => 0.0,
        }
    }
}
