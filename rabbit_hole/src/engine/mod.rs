//! Branching Engine - walks a player down coherence-gated rabbit holes.
//!
//! The engine is generic over two seams:
//!
//! - a [`ContentGraph`], which knows how to present a node, which options it
//!   offers at a depth and what a selected option leads to;
//! - a [`ScoringStrategy`], which scores a selection, judges it correct or
//!   not and turns recorded answers into points.
//!
//! Each node goes through the same cycle:
//! 1. **Present**: collect the node's options and shuffle them
//! 2. **Select**: the [`Player`] picks one (invalid picks re-prompt the node)
//! 3. **Resolve**: score it, log it, raise the depth on a correct answer
//! 4. **Decide**: continue into follow-ups or stop the branch
//! 5. **Recurse**: resolve every follow-up depth-first before returning

mod crafting_graph;
mod question_graph;

pub use crafting_graph::*;
pub use question_graph::*;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SessionConfig;
use crate::error::{EngineError, EngineResult};
use crate::observer::EngineObserver;
use crate::session::{AnsweredQuestion, Assessment, FinishedSession, SessionState};
use crate::threshold::{meets_threshold, required_threshold};

/// A content domain the engine can walk.
pub trait ContentGraph {
    type Node: Clone + PartialEq + fmt::Debug;
    type Choice: Clone + fmt::Debug;

    /// Pick the core (depth 0) nodes a session starts from.
    fn core_nodes<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> EngineResult<Vec<Self::Node>>;

    /// Text shown to the player for this node.
    fn prompt(&self, node: &Self::Node) -> EngineResult<String>;

    /// Unshuffled options offered for this node at this depth.
    fn candidates<R: Rng + ?Sized>(
        &self,
        node: &Self::Node,
        depth: u32,
        rng: &mut R,
    ) -> EngineResult<Vec<Candidate<Self::Choice>>>;

    /// Whether answers to this node count as core-level answers.
    fn is_core(&self, node: &Self::Node) -> bool;

    /// Whether a correct answer to this node opens the next depth.
    fn advances_depth(&self, _node: &Self::Node) -> bool {
        true
    }

    /// Depth at which the follow-ups of a node presented at `depth` are shown.
    fn child_depth(&self, depth: u32, _session: &SessionState) -> u32 {
        depth + 1
    }

    /// A hard session-length cap that overrides coherence.
    fn session_cap_reached(&self, _session: &SessionState, _config: &SessionConfig) -> bool {
        false
    }

    /// Nodes the selected choice leads to. May update session bookkeeping.
    fn followups(
        &self,
        node: &Self::Node,
        choice: &Self::Choice,
        session: &mut SessionState,
    ) -> Vec<Self::Node>;
}

/// How selections are scored and how recorded answers turn into points.
pub trait ScoringStrategy {
    type Choice;

    fn name(&self) -> &'static str;

    /// Effective score in [0, 1], compared against the continuation threshold.
    fn score(&self, choice: &Self::Choice, config: &SessionConfig) -> f64;

    /// Whether the choice counts as correct.
    fn is_correct(&self, choice: &Self::Choice) -> bool;

    /// Snapshot of the choice stored in the answer log.
    fn assess(&self, choice: &Self::Choice, depth: u32, core: bool) -> Assessment;

    /// Text shown to the player after resolving the choice.
    fn feedback(&self, choice: &Self::Choice, correct: bool) -> String;

    /// Unrounded points earned by a recorded answer.
    fn points(&self, answer: &AnsweredQuestion, config: &SessionConfig) -> f64;
}

/// An option before shuffling.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<C> {
    pub label: String,
    pub choice: C,
}

impl<C> Candidate<C> {
    pub fn new(label: impl Into<String>, choice: C) -> Self {
        Self {
            label: label.into(),
            choice,
        }
    }
}

/// Handle to one option of one presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionRef(pub usize);

/// An option as shown to the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentedOption<C> {
    pub option_ref: OptionRef,
    pub label: String,
    pub choice: C,
}

/// A node ready to be answered.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation<N, C> {
    pub node: N,
    pub depth: u32,
    pub prompt: String,
    /// Shuffled options.
    pub options: Vec<PresentedOption<C>>,
}

impl<N, C> Presentation<N, C> {
    pub fn option(&self, option_ref: OptionRef) -> Option<&PresentedOption<C>> {
        self.options.iter().find(|o| o.option_ref == option_ref)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }
}

/// What the player did with a presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(OptionRef),
    /// Input that does not name an option.
    Invalid(String),
    Cancelled,
}

/// The presentation side of the game: shows a node and returns a selection.
pub trait Player {
    fn select<N, C>(&mut self, presentation: &Presentation<N, C>) -> Selection;
}

/// A scored and recorded selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<C> {
    pub option_ref: OptionRef,
    pub label: String,
    pub choice: C,
    pub score: f64,
    pub correct: bool,
    pub feedback: String,
}

/// Why a branch ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StopReason {
    /// The answer scored below the continuation threshold.
    BelowThreshold { score: f64, required: f64 },
    /// The answer leads nowhere.
    NoFollowups,
    /// Enough core questions were answered.
    SessionCapReached,
    /// The follow-up would exceed `max_depth`.
    DepthCapReached,
    /// The follow-up is already being resolved further up the branch.
    Cycle,
}

/// Decision taken after resolving a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Continuation<N> {
    Continue(Vec<N>),
    Stop(StopReason),
}

/// The orchestrator: one content graph, one scoring strategy, one config.
pub struct BranchingEngine<G, S> {
    graph: G,
    strategy: S,
    config: SessionConfig,
}

impl<G, S> BranchingEngine<G, S>
where
    G: ContentGraph,
    S: ScoringStrategy<Choice = G::Choice>,
{
    /// Create an engine. The configuration is validated up front.
    pub fn new(graph: G, strategy: S, config: SessionConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            strategy,
            config,
        })
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Build the shuffled list of options for a node.
    pub fn present_node<R: Rng + ?Sized>(
        &self,
        node: &G::Node,
        depth: u32,
        rng: &mut R,
    ) -> EngineResult<Presentation<G::Node, G::Choice>> {
        let prompt = self.graph.prompt(node)?;
        let mut candidates = self.graph.candidates(node, depth, rng)?;
        if candidates.is_empty() {
            return Err(EngineError::MissingContent(format!(
                "'{}' has no options to offer",
                prompt
            )));
        }

        candidates.shuffle(rng);

        let options = candidates
            .into_iter()
            .enumerate()
            .map(|(i, candidate)| PresentedOption {
                option_ref: OptionRef(i),
                label: candidate.label,
                choice: candidate.choice,
            })
            .collect();

        Ok(Presentation {
            node: node.clone(),
            depth,
            prompt,
            options,
        })
    }

    /// Score and record a selection. Raises the session depth on a correct
    /// answer to a depth-advancing node.
    pub fn resolve_selection(
        &self,
        presentation: &Presentation<G::Node, G::Choice>,
        selection: OptionRef,
        session: &mut SessionState,
    ) -> EngineResult<Resolution<G::Choice>> {
        let option = presentation
            .option(selection)
            .ok_or_else(|| EngineError::InvalidSelection {
                reason: format!("option {} was not presented", selection.0),
                option_count: presentation.options.len(),
            })?;

        let score = self.strategy.score(&option.choice, &self.config);
        let correct = self.strategy.is_correct(&option.choice);
        let core = self.graph.is_core(&presentation.node);

        session.record(AnsweredQuestion {
            question: presentation.prompt.clone(),
            selected: option.label.clone(),
            is_correct: correct,
            depth: presentation.depth,
            core,
            assessment: self
                .strategy
                .assess(&option.choice, presentation.depth, core),
        });

        if correct && self.graph.advances_depth(&presentation.node) {
            session.raise_depth(presentation.depth + 1);
        }

        Ok(Resolution {
            option_ref: option.option_ref,
            label: option.label.clone(),
            choice: option.choice.clone(),
            score,
            correct,
            feedback: self.strategy.feedback(&option.choice, correct),
        })
    }

    /// Decide whether a resolved node opens a deeper layer.
    ///
    /// Continuing needs all of: a score at or above the threshold for the
    /// current session depth, no session cap in force, and at least one
    /// follow-up node.
    pub fn decide_continuation(
        &self,
        node: &G::Node,
        resolution: &Resolution<G::Choice>,
        session: &mut SessionState,
    ) -> Continuation<G::Node> {
        let required = required_threshold(session.depth(), &self.config);
        if !meets_threshold(resolution.score, required) {
            return Continuation::Stop(StopReason::BelowThreshold {
                score: resolution.score,
                required,
            });
        }

        if self.graph.session_cap_reached(session, &self.config) {
            return Continuation::Stop(StopReason::SessionCapReached);
        }

        let followups = self.graph.followups(node, &resolution.choice, session);
        if followups.is_empty() {
            return Continuation::Stop(StopReason::NoFollowups);
        }

        Continuation::Continue(followups)
    }

    /// Resolve a node and everything it leads to, depth-first.
    pub fn explore<P, O, R>(
        &self,
        node: G::Node,
        depth: u32,
        session: &mut SessionState,
        player: &mut P,
        observer: &mut O,
        rng: &mut R,
    ) -> EngineResult<()>
    where
        P: Player,
        O: EngineObserver,
        R: Rng + ?Sized,
    {
        let mut ancestors = Vec::new();
        self.explore_branch(node, depth, &mut ancestors, session, player, observer, rng)
    }

    #[allow(clippy::too_many_arguments)]
    fn explore_branch<P, O, R>(
        &self,
        node: G::Node,
        depth: u32,
        ancestors: &mut Vec<G::Node>,
        session: &mut SessionState,
        player: &mut P,
        observer: &mut O,
        rng: &mut R,
    ) -> EngineResult<()>
    where
        P: Player,
        O: EngineObserver,
        R: Rng + ?Sized,
    {
        if depth > self.config.max_depth {
            observer.branch_stopped(depth, &StopReason::DepthCapReached);
            return Ok(());
        }

        let presentation = match self.present_node(&node, depth, rng) {
            Ok(presentation) => presentation,
            Err(err @ EngineError::MissingContent(_)) => {
                observer.branch_aborted(depth, &err);
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        observer.node_presented(&presentation.prompt, depth, presentation.options.len());

        let resolution = loop {
            let rejected = match player.select(&presentation) {
                Selection::Chosen(option_ref) => {
                    match self.resolve_selection(&presentation, option_ref, session) {
                        Ok(resolution) => break resolution,
                        Err(err) if err.is_recoverable() => err,
                        Err(err) => return Err(err),
                    }
                }
                Selection::Invalid(input) => EngineError::InvalidSelection {
                    reason: format!("unrecognized input '{}'", input),
                    option_count: presentation.options.len(),
                },
                Selection::Cancelled => return Err(EngineError::Cancelled),
            };
            observer.selection_rejected(&presentation.prompt, &rejected);
        };

        if let Some(answer) = session.last_answer() {
            observer.answer_recorded(answer, resolution.score);
        }

        match self.decide_continuation(&node, &resolution, session) {
            Continuation::Continue(followups) => {
                let child_depth = self.graph.child_depth(depth, session);
                observer.branch_continued(child_depth, followups.len());

                ancestors.push(node);
                for next in followups {
                    if ancestors.contains(&next) {
                        observer.branch_stopped(child_depth, &StopReason::Cycle);
                        continue;
                    }
                    self.explore_branch(
                        next,
                        child_depth,
                        ancestors,
                        session,
                        player,
                        observer,
                        rng,
                    )?;
                }
                ancestors.pop();
            }
            Continuation::Stop(reason) => observer.branch_stopped(depth, &reason),
        }

        Ok(())
    }

    /// Play a whole session: every core question and its rabbit holes, then
    /// finalize.
    pub fn play<P, O, R>(
        &self,
        player: &mut P,
        observer: &mut O,
        rng: &mut R,
    ) -> EngineResult<FinishedSession>
    where
        P: Player,
        O: EngineObserver,
        R: Rng + ?Sized,
    {
        let mut session = SessionState::new();
        observer.session_started(session.id(), self.strategy.name());

        let cores = self.graph.core_nodes(self.config.num_core_questions, rng)?;
        for node in cores {
            self.explore(node, 0, &mut session, player, observer, rng)?;
        }

        let finished = session.finalize(&self.strategy, &self.config);
        observer.session_finalized(&finished);
        Ok(finished)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Players and fixtures shared by the engine tests.

    use super::*;
    use std::collections::VecDeque;

    /// Picks options by label, in order. Falls back to cancelling.
    pub struct ScriptedPlayer {
        pub script: VecDeque<Pick>,
        pub prompts: Vec<String>,
    }

    pub enum Pick {
        Label(&'static str),
        Raw(usize),
        Garbage(&'static str),
    }

    impl ScriptedPlayer {
        pub fn new(script: impl IntoIterator<Item = Pick>) -> Self {
            Self {
                script: script.into_iter().collect(),
                prompts: Vec::new(),
            }
        }

        pub fn labels(labels: impl IntoIterator<Item = &'static str>) -> Self {
            Self::new(labels.into_iter().map(Pick::Label))
        }
    }

    impl Player for ScriptedPlayer {
        fn select<N, C>(&mut self, presentation: &Presentation<N, C>) -> Selection {
            self.prompts.push(presentation.prompt.clone());
            match self.script.pop_front() {
                Some(Pick::Label(label)) => presentation
                    .options
                    .iter()
                    .find(|o| o.label == label)
                    .map(|o| Selection::Chosen(o.option_ref))
                    .unwrap_or_else(|| Selection::Invalid(label.to_string())),
                Some(Pick::Raw(index)) => Selection::Chosen(OptionRef(index)),
                Some(Pick::Garbage(input)) => Selection::Invalid(input.to_string()),
                None => Selection::Cancelled,
            }
        }
    }
}
