//! Eras - the question sets of one historical period.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ContentError, ContentResult};
use crate::knowledge::ComponentId;
use crate::question::Question;

/// A historical era: core questions plus the follow-up topics its
/// technologies can lead to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Era {
    pub name: String,
    pub year: i32,
    pub tagline: Option<String>,
    pub overview: Option<String>,

    /// Core (depth 0) questions.
    pub questions: Vec<Question>,

    /// Follow-up questions keyed by the component they ask about.
    pub topics: HashMap<ComponentId, Question>,
}

impl Era {
    pub fn new(name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into(),
            year,
            ..Default::default()
        }
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn with_topic(mut self, component: impl Into<ComponentId>, question: Question) -> Self {
        self.topics.insert(component.into(), question);
        self
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn topic(&self, component: &ComponentId) -> Option<&Question> {
        self.topics.get(component)
    }

    /// Index of a uniformly chosen core question.
    pub fn random_question_index<R: Rng + ?Sized>(&self, rng: &mut R) -> ContentResult<usize> {
        if self.questions.is_empty() {
            return Err(ContentError::EmptyContentSet(format!(
                "era '{}' has no questions",
                self.name
            )));
        }
        Ok(rng.gen_range(0..self.questions.len()))
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
