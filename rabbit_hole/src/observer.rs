//! Engine observers - where the engine reports what it is doing.
//!
//! The engine never logs on its own. Every entry point takes an
//! [`EngineObserver`], and [`TracingObserver`] turns the hooks into
//! structured `tracing` events for whatever subscriber the host installed.

use tracing::{debug, info, warn};

use crate::engine::StopReason;
use crate::error::EngineError;
use crate::session::{AnsweredQuestion, FinishedSession, SessionId};

/// Hooks called by the branching engine. All default to no-ops.
pub trait EngineObserver {
    fn session_started(&mut self, _id: SessionId, _strategy: &str) {}

    fn node_presented(&mut self, _prompt: &str, _depth: u32, _options: usize) {}

    fn selection_rejected(&mut self, _prompt: &str, _error: &EngineError) {}

    fn answer_recorded(&mut self, _answer: &AnsweredQuestion, _score: f64) {}

    fn branch_continued(&mut self, _depth: u32, _followups: usize) {}

    fn branch_stopped(&mut self, _depth: u32, _reason: &StopReason) {}

    /// A node could not be presented; its branch is dropped.
    fn branch_aborted(&mut self, _depth: u32, _error: &EngineError) {}

    fn session_finalized(&mut self, _session: &FinishedSession) {}
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl EngineObserver for NullObserver {}

/// Emits every hook as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn session_started(&mut self, id: SessionId, strategy: &str) {
        info!(session_id = %id, strategy, "Session started");
    }

    fn node_presented(&mut self, prompt: &str, depth: u32, options: usize) {
        debug!(prompt, depth, options, "Presenting node");
    }

    fn selection_rejected(&mut self, prompt: &str, error: &EngineError) {
        warn!(prompt, error = %error, "Selection rejected, re-prompting");
    }

    fn answer_recorded(&mut self, answer: &AnsweredQuestion, score: f64) {
        debug!(
            question = %answer.question,
            selected = %answer.selected,
            correct = answer.is_correct,
            depth = answer.depth,
            score,
            "Answer recorded"
        );
    }

    fn branch_continued(&mut self, depth: u32, followups: usize) {
        info!(depth, followups, "Entering rabbit hole");
    }

    fn branch_stopped(&mut self, depth: u32, reason: &StopReason) {
        debug!(depth, reason = ?reason, "Branch stopped");
    }

    fn branch_aborted(&mut self, depth: u32, error: &EngineError) {
        warn!(depth, error = %error, "Branch aborted");
    }

    fn session_finalized(&mut self, session: &FinishedSession) {
        info!(
            session_id = %session.id,
            final_score = session.summary.final_score,
            depth = session.summary.depth,
            answered = session.summary.answered,
            "Session finalized"
        );
    }
}

/// Keeps a tally of what happened, for hosts that render a recap.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub presented: Vec<String>,
    pub rejections: usize,
    pub stops: Vec<StopReason>,
    pub aborted: usize,
    pub deepest_branch: u32,
    pub finalized: usize,
}

impl EngineObserver for RecordingObserver {
    fn node_presented(&mut self, prompt: &str, _depth: u32, _options: usize) {
        self.presented.push(prompt.to_string());
    }

    fn selection_rejected(&mut self, _prompt: &str, _error: &EngineError) {
        self.rejections += 1;
    }

    fn branch_continued(&mut self, depth: u32, _followups: usize) {
        self.deepest_branch = self.deepest_branch.max(depth);
    }

    fn branch_stopped(&mut self, _depth: u32, reason: &StopReason) {
        self.stops.push(reason.clone());
    }

    fn branch_aborted(&mut self, _depth: u32, _error: &EngineError) {
        self.aborted += 1;
    }

    fn session_finalized(&mut self, _session: &FinishedSession) {
        self.finalized += 1;
    }
}
