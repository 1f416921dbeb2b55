//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Environmental coherence at or above which an answer counts as correct
/// and opens the next depth. Independent of the continuation threshold.
pub const CORRECTNESS_THRESHOLD: f64 = 0.8;

/// Tunables for one playthrough.
///
/// Every field has a default, so partial TOML or JSON documents load. The
/// camelCase spellings of the settings documents are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of core (depth 0) questions per session.
    #[serde(alias = "numCoreQuestions")]
    pub num_core_questions: usize,

    /// Stop crafting rabbit holes once the core questions are used up.
    #[serde(alias = "exitMidRabbitHole")]
    pub exit_mid_rabbit_hole: bool,

    /// Score with environmental x cultural coherence instead of
    /// environmental coherence alone.
    #[serde(alias = "includeCulturalCoherence")]
    pub include_cultural_coherence: bool,

    /// Continuation threshold at depth 0.
    #[serde(alias = "baseCoherenceFloor")]
    pub base_coherence_floor: f64,

    /// Added to the continuation threshold per depth level.
    #[serde(alias = "coherenceRamp")]
    pub coherence_ramp: f64,

    /// Hard recursion cap for content graphs that are not known to be acyclic.
    #[serde(alias = "maxDepth")]
    pub max_depth: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            num_core_questions: 5,
            exit_mid_rabbit_hole: true,
            include_cultural_coherence: false,
            base_coherence_floor: 0.5,
            coherence_ramp: 0.05,
            max_depth: 32,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(document: &str) -> EngineResult<Self> {
        let config: SessionConfig =
            toml::from_str(document).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(document: &str) -> EngineResult<Self> {
        let config: SessionConfig =
            serde_json::from_str(document).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.num_core_questions == 0 {
            return Err(EngineError::Config(
                "num_core_questions must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.base_coherence_floor) {
            return Err(EngineError::Config(format!(
                "base_coherence_floor must be within [0, 1], got {}",
                self.base_coherence_floor
            )));
        }
        if !self.coherence_ramp.is_finite() || self.coherence_ramp < 0.0 {
            return Err(EngineError::Config(format!(
                "coherence_ramp must be finite and non-negative, got {}",
                self.coherence_ramp
            )));
        }
        if self.max_depth == 0 {
            return Err(EngineError::Config("max_depth must be at least 1".to_string()));
        }
        Ok(())
    }
}
