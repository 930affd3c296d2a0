use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::session::game::GameMode;

const RUSH_CATALOG: &str = include_str!("../assets/catalog/rush.json");
const APPLY_CATALOG: &str = include_str!("../assets/catalog/apply.json");

/// Anything the deck and option generator can compare by identity.
pub trait Identified {
    fn id(&self) -> u32;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptItem {
    pub id: u32,
    pub label: String,
    pub definition: String,
    #[serde(default)]
    pub glyph: String,
}

impl Identified for ConceptItem {
    fn id(&self) -> u32 {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioItem {
    pub id: u32,
    pub text: String,
    pub correct_concept_id: u32,
    #[serde(default)]
    pub hint: Option<String>,
}

impl Identified for ScenarioItem {
    fn id(&self) -> u32 {
        self.id
    }
}

/// Plain-language explanation of one concept, paged through on the Learn screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub concept_id: u32,
    pub title: String,
    pub explanation: String,
}

/// Static content table. Read-only once loaded, so sessions share it behind an `Arc`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub concepts: Vec<ConceptItem>,
    #[serde(default)]
    pub scenarios: Vec<ScenarioItem>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Catalog {
    /// The bundled catalog for a mode. Rush uses short definitions, Apply
    /// uses long ones plus the scenario table.
    pub fn builtin(mode: GameMode) -> Self {
        let raw = match mode {
            GameMode::Rush => RUSH_CATALOG,
            GameMode::Apply => APPLY_CATALOG,
        };
        serde_json::from_str(raw).unwrap_or_else(|err| {
            tracing::error!(%err, mode = %mode, "bundled catalog is malformed");
            Catalog::default()
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn concept(&self, id: u32) -> Option<&ConceptItem> {
        self.concepts.iter().find(|c| c.id == id)
    }

    /// Glyph of the concept a lesson explains, empty when it has none.
    pub fn lesson_glyph(&self, lesson: &Lesson) -> &str {
        self.concept(lesson.concept_id)
            .map_or("", |c| c.glyph.as_str())
    }

    /// Ids must be unique per table. Scenarios and lessons must point at a known concept,
    /// one lesson per concept at most.
    pub fn validate(&self) -> Result<(), QuizError> {
        let mut seen = HashSet::new();
        for concept in &self.concepts {
            if !seen.insert(concept.id) {
                return Err(QuizError::config(format!(
                    "duplicate concept id {}",
                    concept.id
                )));
            }
        }

        let mut seen_scenarios = HashSet::new();
        for scenario in &self.scenarios {
            if !seen_scenarios.insert(scenario.id) {
                return Err(QuizError::config(format!(
                    "duplicate scenario id {}",
                    scenario.id
                )));
            }
            if !seen.contains(&scenario.correct_concept_id) {
                return Err(QuizError::config(format!(
                    "scenario {} references unknown concept {}",
                    scenario.id, scenario.correct_concept_id
                )));
            }
        }

        let mut taught = HashSet::new();
        for lesson in &self.lessons {
            if !seen.contains(&lesson.concept_id) {
                return Err(QuizError::config(format!(
                    "lesson \"{}\" references unknown concept {}",
                    lesson.title, lesson.concept_id
                )));
            }
            if !taught.insert(lesson.concept_id) {
                return Err(QuizError::config(format!(
                    "concept {} has more than one lesson",
                    lesson.concept_id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rush_catalog_has_twelve_concepts() {
        let catalog = Catalog::builtin(GameMode::Rush);
        assert_eq!(catalog.concepts.len(), 12);
        assert!(catalog.scenarios.is_empty());
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn builtin_apply_catalog_is_consistent() {
        let catalog = Catalog::builtin(GameMode::Apply);
        assert_eq!(catalog.concepts.len(), 12);
        assert_eq!(catalog.scenarios.len(), 16);
        assert!(catalog.validate().is_ok());
        assert!(catalog.scenarios.iter().all(|s| s.hint.is_some()));
    }

    #[test]
    fn builtin_lessons_cover_every_concept_in_order() {
        let catalog = Catalog::builtin(GameMode::Apply);
        assert_eq!(catalog.lessons.len(), 12);
        let taught: Vec<u32> = catalog.lessons.iter().map(|l| l.concept_id).collect();
        let concepts: Vec<u32> = catalog.concepts.iter().map(|c| c.id).collect();
        assert_eq!(taught, concepts);
        for lesson in &catalog.lessons {
            assert!(!lesson.title.is_empty());
            assert!(!lesson.explanation.is_empty());
            assert!(!catalog.lesson_glyph(lesson).is_empty());
        }
        assert_eq!(catalog.lessons[0].title, "Tokens: Breaking Text Into Pieces");
        assert_eq!(catalog.lesson_glyph(&catalog.lessons[11]), "\u{1f47b}");
    }

    #[test]
    fn lesson_for_unknown_concept_is_rejected() {
        let json = r#"{
            "concepts": [{ "id": 1, "label": "Token", "definition": "pieces" }],
            "lessons": [{ "concept_id": 2, "title": "LLM", "explanation": "patterns" }]
        }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(err.to_string().contains("unknown concept 2"));
    }

    #[test]
    fn second_lesson_for_a_concept_is_rejected() {
        let json = r#"{
            "concepts": [{ "id": 1, "label": "Token", "definition": "pieces" }],
            "lessons": [
                { "concept_id": 1, "title": "Tokens", "explanation": "pieces" },
                { "concept_id": 1, "title": "Tokens again", "explanation": "more pieces" }
            ]
        }"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn dangling_scenario_reference_is_rejected() {
        let json = r#"{
            "concepts": [{ "id": 1, "label": "Token", "definition": "pieces" }],
            "scenarios": [{ "id": 1, "text": "split", "correct_concept_id": 9 }]
        }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(err.to_string().contains("unknown concept 9"));
    }

    #[test]
    fn duplicate_concept_ids_are_rejected() {
        let catalog = Catalog {
            concepts: vec![
                ConceptItem {
                    id: 3,
                    label: "a".into(),
                    definition: "a".into(),
                    glyph: String::new(),
                },
                ConceptItem {
                    id: 3,
                    label: "b".into(),
                    definition: "b".into(),
                    glyph: String::new(),
                },
            ],
            scenarios: Vec::new(),
            lessons: Vec::new(),
        };
        assert!(matches!(
            catalog.validate(),
            Err(QuizError::Configuration(_))
        ));
    }

    #[test]
    fn hint_and_glyph_are_optional_in_json() {
        let json = r#"{
            "concepts": [{ "id": 1, "label": "Token", "definition": "pieces" }],
            "scenarios": [{ "id": 4, "text": "split", "correct_concept_id": 1 }]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.concepts[0].glyph, "");
        assert_eq!(catalog.scenarios[0].hint, None);
        assert!(catalog.lessons.is_empty());
        assert_eq!(catalog.concept(1).map(|c| c.label.as_str()), Some("Token"));
    }
}
