//! Content loading boundary.
//!
//! Raw documents are parsed into `Raw*` mirrors whose fields are all
//! optional, then validated into the strict content model. Everything past
//! this module can rely on required fields being present and in range.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::crafting::{
    CraftingBook, CraftingChoice, CraftingEra, CraftingQuestion, Herring, InfoLink, TechNode,
};
use crate::era::Era;
use crate::error::{ContentError, ContentResult};
use crate::knowledge::{Coherence, ComponentId, KnowledgeKind, KnowledgeTransmission, Recipe};
use crate::question::{Choice, Question, QuestionPrompt};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEra {
    name: Option<String>,
    year: Option<i32>,
    tagline: Option<String>,
    overview: Option<String>,
    questions: Option<Vec<RawQuestion>>,
    #[serde(default)]
    topics: HashMap<String, RawQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    text: Option<String>,
    target: Option<String>,
    choices: Option<Vec<RawChoice>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChoice {
    custom_text: Option<String>,
    custom_success_response: Option<String>,
    custom_failure_response: Option<String>,
    coherence: Option<f64>,
    answer_object: Option<RawAnswer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnswer {
    text: Option<String>,
    year_introduced: Option<i32>,
    environmental_coherence: Option<f64>,
    cultural_coherence: Option<f64>,
    impact_score: Option<f64>,
    recipes: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Deserialize)]
struct RawTechNode {
    name: Option<String>,
    info: Option<String>,
    #[serde(default)]
    links: Vec<InfoLink>,
    #[serde(default)]
    components: Vec<Vec<String>>,
    #[serde(default)]
    herrings: Vec<RawHerring>,
}

#[derive(Debug, Deserialize)]
struct RawHerring {
    #[serde(default)]
    components: Vec<String>,
    plausibility: Option<f64>,
    feedback: Option<String>,
}

/// Crafting eras list their questions either as an array or keyed by id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCraftingQuestions {
    List(Vec<RawCraftingQuestion>),
    Keyed(BTreeMap<String, RawCraftingQuestion>),
}

#[derive(Debug, Deserialize)]
struct RawCraftingEra {
    name: Option<String>,
    questions: Option<RawCraftingQuestions>,
}

#[derive(Debug, Deserialize)]
struct RawCraftingQuestion {
    text: Option<String>,
    info: Option<String>,
    #[serde(default)]
    links: Vec<InfoLink>,
    choices: Option<Vec<RawCraftingChoice>>,
}

#[derive(Debug, Deserialize)]
struct RawCraftingChoice {
    text: Option<String>,
    #[serde(default)]
    correct: bool,
    plausibility: Option<f64>,
    feedback: Option<String>,
    #[serde(default)]
    crafting_targets: Vec<String>,
}

/// Parse and validate an era document.
pub fn parse_era(json: &str) -> ContentResult<Era> {
    let raw: RawEra = serde_json::from_str(json)?;

    let name = non_empty(raw.name, "era", "name")?;
    let year = raw.year.ok_or_else(|| ContentError::missing("era", "year"))?;
    let raw_questions = raw
        .questions
        .ok_or_else(|| ContentError::missing("era", "questions"))?;
    if raw_questions.is_empty() {
        return Err(ContentError::EmptyContentSet(format!(
            "era '{}' has no questions",
            name
        )));
    }

    let questions = raw_questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| validate_question(q, &format!("question {}", i)))
        .collect::<ContentResult<Vec<_>>>()?;

    let topics = raw
        .topics
        .into_iter()
        .map(|(id, q)| -> ContentResult<(ComponentId, Question)> {
            let question = validate_question(q, &format!("topic '{}'", id))?;
            Ok((ComponentId(id), question))
        })
        .collect::<ContentResult<HashMap<_, _>>>()?;

    Ok(Era {
        name,
        year,
        tagline: raw.tagline,
        overview: raw.overview,
        questions,
        topics,
    })
}

/// Parse and validate a crafting book (`techId -> node`).
pub fn parse_crafting_book(json: &str) -> ContentResult<CraftingBook> {
    let raw: BTreeMap<String, RawTechNode> = serde_json::from_str(json)?;
    if raw.is_empty() {
        return Err(ContentError::EmptyContentSet(
            "crafting book has no technologies".to_string(),
        ));
    }

    let mut book = CraftingBook::new();
    for (id, node) in raw {
        book.insert(validate_tech_node(id, node)?);
    }
    Ok(book)
}

/// Parse and validate the core questions of a crafting era.
pub fn parse_crafting_era(json: &str) -> ContentResult<CraftingEra> {
    let raw: RawCraftingEra = serde_json::from_str(json)?;

    let raw_questions = match raw.questions {
        Some(RawCraftingQuestions::List(list)) => list,
        Some(RawCraftingQuestions::Keyed(keyed)) => keyed.into_values().collect(),
        None => return Err(ContentError::missing("crafting era", "questions")),
    };
    if raw_questions.is_empty() {
        return Err(ContentError::EmptyContentSet(
            "crafting era has no questions".to_string(),
        ));
    }

    let questions = raw_questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| validate_crafting_question(q, &format!("crafting question {}", i)))
        .collect::<ContentResult<Vec<_>>>()?;

    Ok(CraftingEra {
        name: raw.name.unwrap_or_default(),
        questions,
    })
}

fn validate_question(raw: RawQuestion, context: &str) -> ContentResult<Question> {
    let prompt = match (raw.text, raw.target) {
        (Some(text), _) if !text.trim().is_empty() => QuestionPrompt::Text(text),
        (_, Some(target)) if !target.trim().is_empty() => QuestionPrompt::Target(target),
        _ => return Err(ContentError::missing(context, "text")),
    };

    let raw_choices = raw
        .choices
        .ok_or_else(|| ContentError::missing(context, "choices"))?;
    if raw_choices.is_empty() {
        return Err(ContentError::missing(context, "choices"));
    }

    let choices = raw_choices
        .into_iter()
        .enumerate()
        .map(|(i, c)| validate_choice(c, &format!("{} choice {}", context, i)))
        .collect::<ContentResult<Vec<_>>>()?;

    Ok(Question { prompt, choices })
}

fn validate_choice(raw: RawChoice, context: &str) -> ContentResult<Choice> {
    let answer = raw
        .answer_object
        .ok_or_else(|| ContentError::missing(context, "answerObject"))?;

    let coherence_override = raw
        .coherence
        .map(|value| unit_interval(value, context, "coherence"))
        .transpose()?;

    Ok(Choice {
        custom_text: raw.custom_text,
        custom_success_response: raw.custom_success_response,
        custom_failure_response: raw.custom_failure_response,
        coherence_override,
        answer: validate_answer(answer, context)?,
    })
}

fn validate_answer(raw: RawAnswer, context: &str) -> ContentResult<KnowledgeTransmission> {
    let text = non_empty(raw.text, context, "text")?;
    let environmental = raw
        .environmental_coherence
        .ok_or_else(|| ContentError::missing(context, "environmentalCoherence"))?;
    let cultural = raw
        .cultural_coherence
        .ok_or_else(|| ContentError::missing(context, "culturalCoherence"))?;
    let impact_score = raw
        .impact_score
        .ok_or_else(|| ContentError::missing(context, "impactScore"))?;
    if !impact_score.is_finite() {
        return Err(ContentError::out_of_range(context, "impactScore", impact_score));
    }

    let kind = match raw.recipes {
        Some(recipes) if !recipes.is_empty() => KnowledgeKind::Technology {
            recipes: recipes
                .into_iter()
                .map(|components| validate_recipe(components, context))
                .collect::<ContentResult<Vec<_>>>()?,
        },
        _ => KnowledgeKind::Idea,
    };

    Ok(KnowledgeTransmission {
        text,
        year_introduced: raw.year_introduced,
        coherence: Coherence {
            environmental: unit_interval(environmental, context, "environmentalCoherence")?,
            cultural: unit_interval(cultural, context, "culturalCoherence")?,
        },
        impact_score,
        kind,
    })
}

fn validate_tech_node(id: String, raw: RawTechNode) -> ContentResult<TechNode> {
    let context = format!("technology '{}'", id);
    if raw.components.is_empty() {
        return Err(ContentError::missing(&context, "components"));
    }

    let recipes = raw
        .components
        .into_iter()
        .map(|components| validate_recipe(components, &context))
        .collect::<ContentResult<Vec<_>>>()?;

    let herrings = raw
        .herrings
        .into_iter()
        .map(|h| -> ContentResult<Herring> {
            let plausibility = h
                .plausibility
                .ok_or_else(|| ContentError::missing(&context, "plausibility"))?;
            Ok(Herring {
                recipe: validate_recipe(h.components, &context)?,
                plausibility: unit_interval(plausibility, &context, "plausibility")?,
                feedback: h.feedback,
            })
        })
        .collect::<ContentResult<Vec<_>>>()?;

    let id = ComponentId(id);
    Ok(TechNode {
        name: raw.name.unwrap_or_else(|| id.display_name()),
        id,
        info: raw.info,
        links: raw.links,
        recipes,
        herrings,
    })
}

fn validate_crafting_question(
    raw: RawCraftingQuestion,
    context: &str,
) -> ContentResult<CraftingQuestion> {
    let text = non_empty(raw.text, context, "text")?;
    let raw_choices = raw
        .choices
        .ok_or_else(|| ContentError::missing(context, "choices"))?;
    if raw_choices.is_empty() {
        return Err(ContentError::missing(context, "choices"));
    }

    let choices = raw_choices
        .into_iter()
        .enumerate()
        .map(|(i, c)| -> ContentResult<CraftingChoice> {
            let choice_context = format!("{} choice {}", context, i);
            let plausibility = c
                .plausibility
                .map(|p| unit_interval(p, &choice_context, "plausibility"))
                .transpose()?;
            Ok(CraftingChoice {
                text: non_empty(c.text, &choice_context, "text")?,
                correct: c.correct,
                plausibility,
                feedback: c.feedback,
                crafting_targets: c.crafting_targets.into_iter().map(ComponentId).collect(),
            })
        })
        .collect::<ContentResult<Vec<_>>>()?;

    Ok(CraftingQuestion {
        text,
        info: raw.info,
        links: raw.links,
        choices,
    })
}

fn validate_recipe(components: Vec<String>, context: &str) -> ContentResult<Recipe> {
    if components.is_empty() || components.iter().any(|c| c.trim().is_empty()) {
        return Err(ContentError::missing(context, "components"));
    }
    Ok(Recipe {
        components: components.into_iter().map(ComponentId).collect(),
    })
}

fn non_empty(value: Option<String>, context: &str, field: &'static str) -> ContentResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ContentError::missing(context, field)),
    }
}

fn unit_interval(value: f64, context: &str, field: &'static str) -> ContentResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ContentError::out_of_range(context, field, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERA_JSON: &str = r#"{
        "name": "Renaissance",
        "year": 1500,
        "tagline": "Wake up in Florence",
        "questions": [
            {
                "text": "How do you light the workshop at night?",
                "choices": [
                    {
                        "customText": "Build an arc lamp",
                        "answerObject": {
                            "text": "Arc lamp",
                            "yearIntroduced": 1802,
                            "environmentalCoherence": 0.9,
                            "culturalCoherence": 0.4,
                            "impactScore": 7,
                            "recipes": [["battery", "carbon_rod"]]
                        }
                    },
                    {
                        "answerObject": {
                            "text": "More candles",
                            "environmentalCoherence": 1.0,
                            "culturalCoherence": 1.0,
                            "impactScore": -1
                        }
                    }
                ]
            }
        ],
        "topics": {
            "battery": {
                "target": "a battery",
                "choices": [
                    {
                        "answerObject": {
                            "text": "Stack copper and zinc in brine",
                            "environmentalCoherence": 0.95,
                            "culturalCoherence": 0.5,
                            "impactScore": 5
                        }
                    }
                ]
            }
        }
    }"#;

    const BOOK_JSON: &str = r#"{
        "battery": {
            "name": "Voltaic Pile",
            "components": [["copper_plate", "zinc_plate", "brine"]],
            "herrings": [
                { "components": ["lemon", "iron_nail"], "plausibility": 0.6 },
                { "components": ["feather"], "plausibility": 0.05, "feedback": "Nope." }
            ]
        },
        "copper_plate": {
            "components": [["copper_ore", "furnace"]]
        }
    }"#;

    #[test]
    fn test_parse_era() {
        let era = parse_era(ERA_JSON).unwrap();

        assert_eq!(era.name, "Renaissance");
        assert_eq!(era.year, 1500);
        assert_eq!(era.question_count(), 1);

        let question = era.question(0).unwrap();
        assert_eq!(question.choices.len(), 2);
        assert_eq!(question.choices[0].text(), "Build an arc lamp");
        assert!(question.choices[0].answer.is_technology());
        assert_eq!(question.choices[0].answer.year_introduced, Some(1802));
        assert_eq!(question.choices[1].text(), "More candles");

        let topic = era.topic(&ComponentId::from("battery")).unwrap();
        assert_eq!(topic.text(), "How would you create or explain: a battery?");
    }

    #[test]
    fn test_parse_era_missing_coherence() {
        let json = r#"{
            "name": "Broken",
            "year": 1500,
            "questions": [
                { "text": "Q", "choices": [ { "answerObject": { "text": "A", "culturalCoherence": 0.5, "impactScore": 1 } } ] }
            ]
        }"#;

        let err = parse_era(json).unwrap_err();
        assert!(matches!(
            err,
            ContentError::MissingField { field: "environmentalCoherence", .. }
        ));
    }

    #[test]
    fn test_parse_era_out_of_range_coherence() {
        let json = r#"{
            "name": "Broken",
            "year": 1500,
            "questions": [
                { "text": "Q", "choices": [ { "answerObject": { "text": "A", "environmentalCoherence": 1.5, "culturalCoherence": 0.5, "impactScore": 1 } } ] }
            ]
        }"#;

        let err = parse_era(json).unwrap_err();
        assert!(matches!(err, ContentError::OutOfRange { .. }));
    }

    #[test]
    fn test_parse_era_without_questions() {
        let json = r#"{ "name": "Empty", "year": 1500, "questions": [] }"#;
        assert!(matches!(
            parse_era(json),
            Err(ContentError::EmptyContentSet(_))
        ));
    }

    #[test]
    fn test_parse_question_without_text_or_target() {
        let json = r#"{
            "name": "Broken",
            "year": 1500,
            "questions": [ { "choices": [] } ]
        }"#;

        let err = parse_era(json).unwrap_err();
        assert!(matches!(err, ContentError::MissingField { field: "text", .. }));
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(parse_era("{ nope"), Err(ContentError::Parse(_))));
    }

    #[test]
    fn test_parse_crafting_book() {
        let book = parse_crafting_book(BOOK_JSON).unwrap();
        assert_eq!(book.len(), 2);

        let battery = book.get(&ComponentId::from("battery")).unwrap();
        assert_eq!(battery.name, "Voltaic Pile");
        assert_eq!(battery.recipes.len(), 1);
        assert_eq!(battery.herrings.len(), 2);
        assert_eq!(battery.herrings[1].feedback.as_deref(), Some("Nope."));

        // Missing names fall back to the title-cased id.
        let plate = book.get(&ComponentId::from("copper_plate")).unwrap();
        assert_eq!(plate.name, "Copper Plate");
    }

    #[test]
    fn test_parse_crafting_book_herring_without_plausibility() {
        let json = r#"{ "battery": { "components": [["a"]], "herrings": [ { "components": ["b"] } ] } }"#;
        let err = parse_crafting_book(json).unwrap_err();
        assert!(matches!(err, ContentError::MissingField { field: "plausibility", .. }));
    }

    #[test]
    fn test_parse_crafting_era_keyed_questions() {
        let json = r#"{
            "name": "1500AD",
            "questions": {
                "light": {
                    "text": "The workshop is dark. What do you do?",
                    "choices": [
                        { "text": "Build a battery", "correct": true, "crafting_targets": ["battery"] },
                        { "text": "Pray", "plausibility": 0.1, "feedback": "Nothing happens." }
                    ]
                }
            }
        }"#;

        let era = parse_crafting_era(json).unwrap();
        assert_eq!(era.questions.len(), 1);

        let question = era.question(0).unwrap();
        assert!(question.choices[0].correct);
        assert_eq!(question.choices[0].crafting_targets, vec![ComponentId::from("battery")]);
        assert!(!question.choices[1].correct);
        assert_eq!(question.choices[1].plausibility, Some(0.1));
    }
}
