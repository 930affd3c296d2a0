use crate::catalog::{ConceptItem, ScenarioItem};
use crate::engine::outcome::Outcome;

/// What a round asks. In both modes the answer is a concept id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub item_id: u32,
    pub prompt: String,
    pub glyph: String,
    pub hint: Option<String>,
    pub answer_id: u32,
}

impl Question {
    /// Rush asks for the definition of a named concept.
    pub fn from_concept(concept: &ConceptItem) -> Self {
        Self {
            item_id: concept.id,
            prompt: concept.label.clone(),
            glyph: concept.glyph.clone(),
            hint: None,
            answer_id: concept.id,
        }
    }

    /// Apply asks which concept a scenario describes.
    pub fn from_scenario(scenario: &ScenarioItem) -> Self {
        Self {
            item_id: scenario.id,
            prompt: scenario.text.clone(),
            glyph: String::new(),
            hint: scenario.hint.clone(),
            answer_id: scenario.correct_concept_id,
        }
    }
}

/// Notifications for the presentation layer, queued in emission order.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    RoundPresented {
        index: usize,
        total: usize,
        question: Question,
        options: Vec<ConceptItem>,
    },
    AnswerResolved {
        correct: bool,
        selected_id: u32,
        target_id: u32,
        delta: i64,
    },
    HintRevealed {
        hint: String,
        cost: i64,
    },
    ScoreChanged {
        score: i64,
        streak: u32,
    },
    StreakReached {
        streak: u32,
    },
    TimeChanged {
        remaining: u32,
        urgent: bool,
    },
    ClockExpired,
    ReadyToAdvance,
    GameOver(Outcome),
}
