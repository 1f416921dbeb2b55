//! Knowledge transmissions - the records a choice is "about".

use serde::{Deserialize, Serialize};

/// Identifier of a craftable component or follow-up topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render a snake_case id as Title Case ("copper_wire" -> "Copper Wire").
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One way of building something: an ordered list of components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub components: Vec<ComponentId>,
}

impl Recipe {
    pub fn new(components: impl IntoIterator<Item = impl Into<ComponentId>>) -> Self {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// Factual and cultural validity of a piece of knowledge, both in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coherence {
    /// Does it work in this environment (physically, materially)?
    pub environmental: f64,
    /// Would the culture of the era accept it?
    pub cultural: f64,
}

impl Coherence {
    pub fn new(environmental: f64, cultural: f64) -> Self {
        Self {
            environmental: environmental.clamp(0.0, 1.0),
            cultural: cultural.clamp(0.0, 1.0),
        }
    }

    /// Environmental and cultural coherence multiplied together.
    pub fn combined(&self) -> f64 {
        self.environmental * self.cultural
    }
}

/// What kind of knowledge this is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KnowledgeKind {
    /// An idea with nothing to build.
    Idea,
    /// A technology that can be built from any one of its recipes.
    Technology { recipes: Vec<Recipe> },
}

/// A piece of knowledge the player tries to transmit to the past.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeTransmission {
    pub text: String,
    pub year_introduced: Option<i32>,
    pub coherence: Coherence,
    /// Signed, unbounded effect on the world.
    pub impact_score: f64,
    pub kind: KnowledgeKind,
}

pub const DEFAULT_SUCCESS_RESPONSE: &str = "Your knowledge spreads and changes the world!";
pub const DEFAULT_FAILURE_RESPONSE: &str = "Your ideas fall on deaf ears...";

impl KnowledgeTransmission {
    /// Create an idea with the given coherence pair and zero impact.
    pub fn new(text: impl Into<String>, environmental: f64, cultural: f64) -> Self {
        Self {
            text: text.into(),
            year_introduced: None,
            coherence: Coherence::new(environmental, cultural),
            impact_score: 0.0,
            kind: KnowledgeKind::Idea,
        }
    }

    pub fn with_impact(mut self, impact_score: f64) -> Self {
        self.impact_score = impact_score;
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year_introduced = Some(year);
        self
    }

    /// Turn this knowledge into a technology with the given recipes.
    pub fn with_recipes(mut self, recipes: Vec<Recipe>) -> Self {
        self.kind = KnowledgeKind::Technology { recipes };
        self
    }

    pub fn environmental_coherence(&self) -> f64 {
        self.coherence.environmental
    }

    pub fn cultural_coherence(&self) -> f64 {
        self.coherence.cultural
    }

    pub fn is_technology(&self) -> bool {
        matches!(self.kind, KnowledgeKind::Technology { .. })
    }

    pub fn recipes(&self) -> &[Recipe] {
        match &self.kind {
            KnowledgeKind::Technology { recipes } => recipes,
            KnowledgeKind::Idea => &[],
        }
    }

    /// Every component named by any recipe, first occurrence order, no repeats.
    pub fn recipe_components(&self) -> Vec<ComponentId> {
        let mut seen = Vec::new();
        for component in self.recipes().iter().flat_map(|r| r.components.iter()) {
            if !seen.contains(component) {
                seen.push(component.clone());
            }
        }
        seen
    }
}
