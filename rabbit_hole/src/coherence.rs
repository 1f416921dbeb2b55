//! Coherence evaluation - how "correct" a selected choice is.

use era_content::Choice;
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

/// Which coherence measure scores a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoherenceStrategy {
    /// Environmental (factual) coherence alone.
    EnvironmentalOnly,
    /// Environmental x cultural coherence, or the choice's override.
    CulturallyCombined,
}

impl CoherenceStrategy {
    pub fn from_config(config: &SessionConfig) -> Self {
        if config.include_cultural_coherence {
            CoherenceStrategy::CulturallyCombined
        } else {
            CoherenceStrategy::EnvironmentalOnly
        }
    }

    /// Pick the measure this strategy scores with.
    pub fn select(&self, environmental: f64, combined: f64) -> f64 {
        match self {
            CoherenceStrategy::EnvironmentalOnly => environmental,
            CoherenceStrategy::CulturallyCombined => combined,
        }
    }
}

/// Score a choice in [0, 1] under the configured strategy.
pub fn evaluate(choice: &Choice, config: &SessionConfig) -> f64 {
    CoherenceStrategy::from_config(config)
        .select(choice.environmental_coherence(), choice.coherence())
        .clamp(0.0, 1.0)
}
