//! Crafting content - technologies, their recipes and decoy herrings.
//!
//! A technology can be built from any one of its recipes. Herrings are
//! authored wrong recipes, each tagged with how plausible it looks so the
//! engine can decide whether to offer it at a given depth.

mod flavor;

pub use flavor::*;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ContentError, ContentResult};
use crate::knowledge::{ComponentId, Recipe};

/// Further reading attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoLink {
    pub text: String,
    pub url: String,
}

/// A decoy recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Herring {
    pub recipe: Recipe,
    /// How close to working this looks, 0.0 - 1.0.
    pub plausibility: f64,
    /// Authored failure text, replacing the generated one.
    pub feedback: Option<String>,
}

impl Herring {
    pub fn new(recipe: Recipe, plausibility: f64) -> Self {
        Self {
            recipe,
            plausibility: plausibility.clamp(0.0, 1.0),
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// A craftable technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechNode {
    pub id: ComponentId,
    pub name: String,
    pub info: Option<String>,
    pub links: Vec<InfoLink>,
    /// Every valid recipe. Any one of them is correct.
    pub recipes: Vec<Recipe>,
    pub herrings: Vec<Herring>,
}

impl TechNode {
    pub fn new(id: impl Into<ComponentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            info: None,
            links: Vec::new(),
            recipes: Vec::new(),
            herrings: Vec::new(),
        }
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.push(recipe);
        self
    }

    pub fn with_herring(mut self, herring: Herring) -> Self {
        self.herrings.push(herring);
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    /// Herrings at or above the given plausibility floor.
    pub fn herrings_at_least(&self, floor: f64) -> impl Iterator<Item = &Herring> {
        self.herrings.iter().filter(move |h| h.plausibility >= floor)
    }
}

/// All craftable technologies, keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CraftingBook {
    nodes: HashMap<ComponentId, TechNode>,
}

impl CraftingBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: TechNode) -> Self {
        self.insert(node);
        self
    }

    pub fn insert(&mut self, node: TechNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn get(&self, id: &ComponentId) -> Option<&TechNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Display name of a component: the node's name, or its id in Title Case.
    pub fn component_name(&self, id: &ComponentId) -> String {
        self.nodes
            .get(id)
            .map(|node| node.name.clone())
            .unwrap_or_else(|| id.display_name())
    }

    /// A recipe rendered as "Copper Plate + Zinc Plate + Brine".
    pub fn recipe_label(&self, recipe: &Recipe) -> String {
        recipe
            .components
            .iter()
            .map(|id| self.component_name(id))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

/// One answer to a crafting core question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftingChoice {
    pub text: String,
    pub correct: bool,
    pub plausibility: Option<f64>,
    pub feedback: Option<String>,
    /// Technologies the player has to build after picking this.
    pub crafting_targets: Vec<ComponentId>,
}

impl CraftingChoice {
    pub fn correct(
        text: impl Into<String>,
        targets: impl IntoIterator<Item = impl Into<ComponentId>>,
    ) -> Self {
        Self {
            text: text.into(),
            correct: true,
            plausibility: None,
            feedback: None,
            crafting_targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn wrong(text: impl Into<String>, plausibility: f64) -> Self {
        Self {
            text: text.into(),
            correct: false,
            plausibility: Some(plausibility.clamp(0.0, 1.0)),
            feedback: None,
            crafting_targets: Vec::new(),
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// A core question of the crafting variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftingQuestion {
    pub text: String,
    pub info: Option<String>,
    pub links: Vec<InfoLink>,
    pub choices: Vec<CraftingChoice>,
}

impl CraftingQuestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            info: None,
            links: Vec::new(),
            choices: Vec::new(),
        }
    }

    pub fn with_choice(mut self, choice: CraftingChoice) -> Self {
        self.choices.push(choice);
        self
    }
}

/// The core questions of a crafting era.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CraftingEra {
    pub name: String,
    pub questions: Vec<CraftingQuestion>,
}

impl CraftingEra {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            questions: Vec::new(),
        }
    }

    pub fn with_question(mut self, question: CraftingQuestion) -> Self {
        self.questions.push(question);
        self
    }

    pub fn question(&self, index: usize) -> Option<&CraftingQuestion> {
        self.questions.get(index)
    }

    pub fn random_question_index<R: Rng + ?Sized>(&self, rng: &mut R) -> ContentResult<usize> {
        if self.questions.is_empty() {
            return Err(ContentError::EmptyContentSet(format!(
                "crafting era '{}' has no questions",
                self.name
            )));
        }
        Ok(rng.gen_range(0..self.questions.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery_book() -> CraftingBook {
        CraftingBook::new()
            .with_node(
                TechNode::new("battery", "Voltaic Pile")
                    .with_recipe(Recipe::new(["copper_plate", "zinc_plate", "brine"]))
                    .with_herring(Herring::new(Recipe::new(["lemon", "iron_nail"]), 0.6))
                    .with_herring(Herring::new(Recipe::new(["feather", "prayer"]), 0.05)),
            )
            .with_node(
                TechNode::new("copper_plate", "Hammered Copper Plate")
                    .with_recipe(Recipe::new(["copper_ore", "furnace"])),
            )
    }

    #[test]
    fn test_component_name_lookup_and_fallback() {
        let book = battery_book();
        assert_eq!(
            book.component_name(&ComponentId::from("copper_plate")),
            "Hammered Copper Plate"
        );
        assert_eq!(book.component_name(&ComponentId::from("zinc_plate")), "Zinc Plate");
    }

    #[test]
    fn test_recipe_label() {
        let book = battery_book();
        let label = book.recipe_label(&Recipe::new(["copper_plate", "zinc_plate", "brine"]));
        assert_eq!(label, "Hammered Copper Plate + Zinc Plate + Brine");
    }

    #[test]
    fn test_herrings_at_least_is_inclusive() {
        let book = battery_book();
        let battery = book.get(&ComponentId::from("battery")).unwrap();

        assert_eq!(battery.herrings_at_least(0.6).count(), 1);
        assert_eq!(battery.herrings_at_least(0.61).count(), 0);
        assert_eq!(battery.herrings_at_least(0.0).count(), 2);
    }

    #[test]
    fn test_crafting_choice_builders() {
        let right = CraftingChoice::correct("Build a battery", ["battery"]);
        assert!(right.correct);
        assert_eq!(right.crafting_targets, vec![ComponentId::from("battery")]);

        let wrong = CraftingChoice::wrong("Pray for lightning", 1.7);
        assert!(!wrong.correct);
        assert_eq!(wrong.plausibility, Some(1.0));
    }
}
