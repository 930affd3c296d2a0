use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StarThresholds;
use crate::engine::scoring::accuracy_percent;
use crate::session::game::GameMode;

/// Star rating for `score`. Assumes `one < two < three`; misordered thresholds
/// are the caller's problem.
pub fn stars_for(score: i64, thresholds: &StarThresholds) -> u8 {
    if score >= thresholds.three {
        3
    } else if score >= thresholds.two {
        2
    } else if score >= thresholds.one {
        1
    } else {
        0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
}

impl Mood {
    pub fn from_accuracy(accuracy: u32) -> Self {
        if accuracy > 60 {
            Mood::Happy
        } else if accuracy >= 40 {
            Mood::Neutral
        } else {
            Mood::Sad
        }
    }

    pub fn face(self) -> &'static str {
        match self {
            Mood::Happy => "(^_^)",
            Mood::Neutral => "(-_-)",
            Mood::Sad => "(;_;)",
        }
    }
}

/// Final tally of a finished session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub mode: GameMode,
    pub final_score: i64,
    pub correct_count: usize,
    pub total_rounds: usize,
    pub stars: u8,
    pub finished_at: DateTime<Utc>,
}

impl Outcome {
    pub fn new(
        mode: GameMode,
        final_score: i64,
        correct_count: usize,
        total_rounds: usize,
        thresholds: &StarThresholds,
    ) -> Self {
        Self {
            mode,
            final_score,
            correct_count,
            total_rounds,
            stars: stars_for(final_score, thresholds),
            finished_at: Utc::now(),
        }
    }

    pub fn accuracy_percent(&self) -> u32 {
        accuracy_percent(self.correct_count, self.total_rounds)
    }

    pub fn mood(&self) -> Mood {
        Mood::from_accuracy(self.accuracy_percent())
    }

    /// Headline shown on the result screen. Rush judges by stars, Apply by accuracy.
    pub fn verdict(&self) -> &'static str {
        match self.mode {
            GameMode::Rush => match self.stars {
                3 => "AMAZING! You're an AI Master!",
                2 => "Great job! You're learning fast!",
                1 => "Good start! Keep practicing!",
                _ => "Don't give up! Try again!",
            },
            GameMode::Apply => {
                let accuracy = self.accuracy_percent();
                if accuracy >= 90 {
                    "Outstanding! You truly understand AI!"
                } else if accuracy >= 70 {
                    "Great job! You're getting the hang of it!"
                } else if accuracy >= 50 {
                    "Good effort! Keep practicing!"
                } else {
                    "Keep learning! You'll improve!"
                }
            }
        }
    }

    /// Whether the result deserves a celebration.
    pub fn celebrate(&self) -> bool {
        self.stars >= 2
    }
}
