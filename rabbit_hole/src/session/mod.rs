//! Session state - everything one playthrough accumulates.
//!
//! The state is created at game start, mutated only by the branching engine
//! and consumed by [`SessionState::finalize`], which makes "finalized exactly
//! once" a property of the type rather than a runtime check.

mod summary;

pub use summary::*;

use era_content::ComponentId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::engine::ScoringStrategy;

/// Unique identifier for a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the scoring strategy saw when an answer was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Assessment {
    /// An answer about a piece of knowledge.
    Knowledge {
        environmental: f64,
        /// Environmental x cultural, or the choice's override.
        combined: f64,
        impact: f64,
    },
    /// A crafting answer. `points` is what the answer earned.
    Crafting {
        valid: bool,
        plausibility: Option<f64>,
        points: f64,
    },
}

impl Assessment {
    /// The answer's effect on the world, used for best/worst outcomes.
    pub fn impact(&self) -> f64 {
        match self {
            Assessment::Knowledge { impact, .. } => *impact,
            Assessment::Crafting { points, .. } => *points,
        }
    }
}

/// One entry of the answer log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question: String,
    pub selected: String,
    pub is_correct: bool,
    /// Depth the question was presented at.
    pub depth: u32,
    /// Whether this was a core-level question.
    pub core: bool,
    pub assessment: Assessment,
}

impl AnsweredQuestion {
    pub fn impact(&self) -> f64 {
        self.assessment.impact()
    }
}

/// Mutable accumulator for a single playthrough.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionState {
    id: SessionId,

    /// Deepest rabbit hole level reached through correct answers.
    depth: u32,

    /// Append-only answer log.
    answered: Vec<AnsweredQuestion>,

    /// Crafting targets still waiting to be built.
    unsolved_components: VecDeque<ComponentId>,

    /// Crafting targets already built this session.
    solved_components: Vec<ComponentId>,

    /// The crafting target currently being resolved.
    current_target: Option<ComponentId>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn answered(&self) -> &[AnsweredQuestion] {
        &self.answered
    }

    pub fn last_answer(&self) -> Option<&AnsweredQuestion> {
        self.answered.last()
    }

    /// Number of core-level questions answered so far.
    pub fn core_answered(&self) -> usize {
        self.answered.iter().filter(|a| a.core).count()
    }

    pub fn unsolved_components(&self) -> &VecDeque<ComponentId> {
        &self.unsolved_components
    }

    pub fn current_target(&self) -> Option<&ComponentId> {
        self.current_target.as_ref()
    }

    pub fn is_solved(&self, component: &ComponentId) -> bool {
        self.solved_components.contains(component)
    }

    pub fn is_pending(&self, component: &ComponentId) -> bool {
        self.unsolved_components.contains(component)
            || self.current_target.as_ref() == Some(component)
    }

    /// Append an answer to the log.
    pub(crate) fn record(&mut self, answer: AnsweredQuestion) {
        self.answered.push(answer);
    }

    /// Raise the depth to at least `depth`. Never lowers it.
    pub(crate) fn raise_depth(&mut self, depth: u32) {
        self.depth = self.depth.max(depth);
    }

    /// Replace the pending crafting targets.
    pub(crate) fn replace_unsolved(&mut self, targets: impl IntoIterator<Item = ComponentId>) {
        self.unsolved_components = targets.into_iter().collect();
    }

    /// Queue components ahead of everything pending, keeping their order.
    pub(crate) fn push_unsolved_front(&mut self, components: Vec<ComponentId>) {
        for component in components.into_iter().rev() {
            self.unsolved_components.push_front(component);
        }
    }

    /// Pop the next pending target and make it current.
    pub(crate) fn next_target(&mut self) -> Option<ComponentId> {
        self.current_target = self.unsolved_components.pop_front();
        self.current_target.clone()
    }

    pub(crate) fn mark_solved(&mut self, component: ComponentId) {
        if self.current_target.as_ref() == Some(&component) {
            self.current_target = None;
        }
        if !self.solved_components.contains(&component) {
            self.solved_components.push(component);
        }
    }

    /// Close the session and compute its summary.
    pub fn finalize<S: ScoringStrategy + ?Sized>(
        self,
        strategy: &S,
        config: &SessionConfig,
    ) -> FinishedSession {
        let summary = SessionSummary::from_history(&self.answered, self.depth, strategy, config);
        FinishedSession {
            id: self.id,
            state: self,
            summary,
        }
    }
}
