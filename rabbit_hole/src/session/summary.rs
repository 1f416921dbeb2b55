//! End-of-session scoring and the archive of finished sessions.

use serde::{Deserialize, Serialize};

use super::{AnsweredQuestion, SessionId, SessionState};
use crate::config::SessionConfig;
use crate::engine::ScoringStrategy;

/// Reported for best/worst outcome when nothing was answered.
pub const NO_OUTCOME: &str = "None";

/// Sum every answer's points and round once, at the very end.
pub fn final_score<S: ScoringStrategy + ?Sized>(
    history: &[AnsweredQuestion],
    strategy: &S,
    config: &SessionConfig,
) -> i64 {
    let total: f64 = history.iter().map(|a| strategy.points(a, config)).sum();
    total.round() as i64
}

/// Question text of the answer with the highest impact; first one wins ties.
pub fn best_impact(history: &[AnsweredQuestion]) -> String {
    pick_by_impact(history, |candidate, best| candidate > best)
}

/// Question text of the answer with the lowest impact; first one wins ties.
pub fn worst_mistake(history: &[AnsweredQuestion]) -> String {
    pick_by_impact(history, |candidate, worst| candidate < worst)
}

fn pick_by_impact(history: &[AnsweredQuestion], replaces: impl Fn(f64, f64) -> bool) -> String {
    let mut picked: Option<&AnsweredQuestion> = None;
    for answer in history {
        match picked {
            Some(current) if !replaces(answer.impact(), current.impact()) => {}
            _ => picked = Some(answer),
        }
    }
    picked
        .map(|a| a.question.clone())
        .unwrap_or_else(|| NO_OUTCOME.to_string())
}

/// Final results of a playthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub final_score: i64,
    pub best_impact: String,
    pub worst_mistake: String,
    /// Deepest level reached.
    pub depth: u32,
    pub answered: usize,
    pub correct: usize,
}

impl SessionSummary {
    pub fn from_history<S: ScoringStrategy + ?Sized>(
        history: &[AnsweredQuestion],
        depth: u32,
        strategy: &S,
        config: &SessionConfig,
    ) -> Self {
        Self {
            final_score: final_score(history, strategy, config),
            best_impact: best_impact(history),
            worst_mistake: worst_mistake(history),
            depth,
            answered: history.len(),
            correct: history.iter().filter(|a| a.is_correct).count(),
        }
    }
}

/// A finalized, immutable session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinishedSession {
    pub id: SessionId,
    pub state: SessionState,
    pub summary: SessionSummary,
}

/// History of completed sessions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionArchive {
    completed: Vec<FinishedSession>,
}

impl SessionArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, session: FinishedSession) {
        self.completed.push(session);
    }

    /// The most recently saved session.
    pub fn last(&self) -> Option<&FinishedSession> {
        self.completed.last()
    }

    pub fn get(&self, id: SessionId) -> Option<&FinishedSession> {
        self.completed.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FinishedSession> {
        self.completed.iter()
    }
}
