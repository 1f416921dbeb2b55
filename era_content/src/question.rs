//! Questions and the choices offered for them.

use serde::{Deserialize, Serialize};

use crate::knowledge::{
    KnowledgeTransmission, DEFAULT_FAILURE_RESPONSE, DEFAULT_SUCCESS_RESPONSE,
};

/// Where a question's text comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuestionPrompt {
    /// Authored question text.
    Text(String),
    /// No text; ask about the described target instead.
    Target(String),
}

/// A question with its ordered choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: QuestionPrompt,
    pub choices: Vec<Choice>,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            prompt: QuestionPrompt::Text(text.into()),
            choices: Vec::new(),
        }
    }

    /// A question derived from the description of its target.
    pub fn about(target: impl Into<String>) -> Self {
        Self {
            prompt: QuestionPrompt::Target(target.into()),
            choices: Vec::new(),
        }
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_choices(mut self, choices: impl IntoIterator<Item = Choice>) -> Self {
        self.choices.extend(choices);
        self
    }

    pub fn text(&self) -> String {
        match &self.prompt {
            QuestionPrompt::Text(text) => text.clone(),
            QuestionPrompt::Target(target) => {
                format!("How would you create or explain: {}?", target)
            }
        }
    }
}

/// One answer to a question, pointing at the knowledge it is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub custom_text: Option<String>,
    pub custom_success_response: Option<String>,
    pub custom_failure_response: Option<String>,
    /// Replaces the answer's combined coherence when set.
    pub coherence_override: Option<f64>,
    pub answer: KnowledgeTransmission,
}

impl Choice {
    pub fn new(answer: KnowledgeTransmission) -> Self {
        Self {
            custom_text: None,
            custom_success_response: None,
            custom_failure_response: None,
            coherence_override: None,
            answer,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.custom_text = Some(text.into());
        self
    }

    pub fn with_success_response(mut self, text: impl Into<String>) -> Self {
        self.custom_success_response = Some(text.into());
        self
    }

    pub fn with_failure_response(mut self, text: impl Into<String>) -> Self {
        self.custom_failure_response = Some(text.into());
        self
    }

    pub fn with_coherence_override(mut self, coherence: f64) -> Self {
        self.coherence_override = Some(coherence.clamp(0.0, 1.0));
        self
    }

    pub fn text(&self) -> &str {
        self.custom_text.as_deref().unwrap_or(&self.answer.text)
    }

    pub fn success_response(&self) -> &str {
        self.custom_success_response
            .as_deref()
            .unwrap_or(DEFAULT_SUCCESS_RESPONSE)
    }

    pub fn failure_response(&self) -> &str {
        self.custom_failure_response
            .as_deref()
            .unwrap_or(DEFAULT_FAILURE_RESPONSE)
    }

    /// Combined coherence of the answer, or the override when present.
    pub fn coherence(&self) -> f64 {
        self.coherence_override
            .unwrap_or_else(|| self.answer.coherence.combined())
    }

    pub fn environmental_coherence(&self) -> f64 {
        self.answer.environmental_coherence()
    }

    pub fn impact_score(&self) -> f64 {
        self.answer.impact_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printing_press() -> KnowledgeTransmission {
        KnowledgeTransmission::new("Movable type printing", 0.9, 0.7).with_impact(8.0)
    }

    #[test]
    fn test_question_text_from_prompt() {
        let question = Question::new("How do you spread literacy?");
        assert_eq!(question.text(), "How do you spread literacy?");
    }

    #[test]
    fn test_question_text_derived_from_target() {
        let question = Question::about("the printing press");
        assert_eq!(
            question.text(),
            "How would you create or explain: the printing press?"
        );
    }

    #[test]
    fn test_choice_text_falls_back_to_answer() {
        let plain = Choice::new(printing_press());
        assert_eq!(plain.text(), "Movable type printing");

        let custom = Choice::new(printing_press()).with_text("Carve letters in wood");
        assert_eq!(custom.text(), "Carve letters in wood");
    }

    #[test]
    fn test_choice_responses() {
        let plain = Choice::new(printing_press());
        assert_eq!(plain.success_response(), DEFAULT_SUCCESS_RESPONSE);
        assert_eq!(plain.failure_response(), DEFAULT_FAILURE_RESPONSE);

        let custom = Choice::new(printing_press())
            .with_success_response("Gutenberg is jealous.")
            .with_failure_response("The monks burn your pamphlets.");
        assert_eq!(custom.success_response(), "Gutenberg is jealous.");
        assert_eq!(custom.failure_response(), "The monks burn your pamphlets.");
    }

    #[test]
    fn test_choice_coherence() {
        let plain = Choice::new(printing_press());
        assert!((plain.coherence() - 0.63).abs() < 0.001);
        assert!((plain.environmental_coherence() - 0.9).abs() < 0.001);

        let overridden = Choice::new(printing_press()).with_coherence_override(0.25);
        assert!((overridden.coherence() - 0.25).abs() < 0.001);
        assert!((overridden.environmental_coherence() - 0.9).abs() < 0.001);
    }
}
