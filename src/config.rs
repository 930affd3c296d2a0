use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::session::game::GameMode;

/// Answer slots a player can pick from the keyboard (`1`-`4`, `a`-`d`).
pub const MAX_OPTIONS_PER_QUESTION: usize = 4;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    #[serde(default)]
    pub rush: RushConfig,
    #[serde(default)]
    pub apply: ApplyConfig,
}

/// Score thresholds for one, two and three stars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarThresholds {
    pub one: i64,
    pub two: i64,
    pub three: i64,
}

/// When the Apply hint cost is taken from the score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintCharge {
    /// Deducted the moment the hint is revealed.
    #[default]
    OnRequest,
    /// Deducted from the award of a correct answer; wrong answers ignore it.
    OnCorrect,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RushConfig {
    #[serde(default = "default_rush_questions")]
    pub questions_per_game: usize,
    #[serde(default = "default_options_per_question")]
    pub options_per_question: usize,
    #[serde(default = "default_correct_points")]
    pub correct_points: i64,
    /// Subtracted from the score on a wrong answer.
    #[serde(default = "default_rush_wrong_penalty")]
    pub wrong_penalty: i64,
    #[serde(default = "default_total_time")]
    pub total_time: u32,
    #[serde(default = "default_time_penalty")]
    pub time_penalty: u32,
    #[serde(default = "default_urgent_time_threshold")]
    pub urgent_time_threshold: u32,
    #[serde(default = "default_streak_multiplier_base")]
    pub streak_multiplier_base: f64,
    #[serde(default = "default_time_bonus_factor")]
    pub time_bonus_factor: f64,
    #[serde(default = "default_streak_signal_threshold")]
    pub streak_signal_threshold: u32,
    #[serde(default = "default_rush_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
    #[serde(default = "default_rush_stars")]
    pub star_thresholds: StarThresholds,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplyConfig {
    #[serde(default = "default_apply_questions")]
    pub questions_per_game: usize,
    #[serde(default = "default_options_per_question")]
    pub options_per_question: usize,
    #[serde(default = "default_correct_points")]
    pub correct_points: i64,
    /// Signed delta added to the score on a wrong answer.
    #[serde(default = "default_apply_wrong_penalty")]
    pub wrong_penalty: i64,
    #[serde(default = "default_hint_penalty")]
    pub hint_penalty: i64,
    #[serde(default)]
    pub hint_charge: HintCharge,
    #[serde(default = "default_apply_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
    #[serde(default = "default_apply_stars")]
    pub star_thresholds: StarThresholds,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_tick_millis() -> u64 {
    1000
}
fn default_rush_questions() -> usize {
    12
}
fn default_apply_questions() -> usize {
    16
}
fn default_options_per_question() -> usize {
    4
}
fn default_correct_points() -> i64 {
    100
}
fn default_rush_wrong_penalty() -> i64 {
    50
}
fn default_apply_wrong_penalty() -> i64 {
    -25
}
fn default_hint_penalty() -> i64 {
    15
}
fn default_total_time() -> u32 {
    60
}
fn default_time_penalty() -> u32 {
    3
}
fn default_urgent_time_threshold() -> u32 {
    10
}
fn default_streak_multiplier_base() -> f64 {
    0.5
}
fn default_time_bonus_factor() -> f64 {
    2.0
}
fn default_streak_signal_threshold() -> u32 {
    3
}
fn default_rush_feedback_delay_ms() -> u64 {
    800
}
fn default_apply_feedback_delay_ms() -> u64 {
    1500
}
fn default_rush_stars() -> StarThresholds {
    StarThresholds {
        one: 400,
        two: 800,
        three: 1000,
    }
}
fn default_apply_stars() -> StarThresholds {
    StarThresholds {
        one: 600,
        two: 1000,
        three: 1400,
    }
}

impl Default for RushConfig {
    fn default() -> Self {
        Self {
            questions_per_game: default_rush_questions(),
            options_per_question: default_options_per_question(),
            correct_points: default_correct_points(),
            wrong_penalty: default_rush_wrong_penalty(),
            total_time: default_total_time(),
            time_penalty: default_time_penalty(),
            urgent_time_threshold: default_urgent_time_threshold(),
            streak_multiplier_base: default_streak_multiplier_base(),
            time_bonus_factor: default_time_bonus_factor(),
            streak_signal_threshold: default_streak_signal_threshold(),
            feedback_delay_ms: default_rush_feedback_delay_ms(),
            star_thresholds: default_rush_stars(),
        }
    }
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            questions_per_game: default_apply_questions(),
            options_per_question: default_options_per_question(),
            correct_points: default_correct_points(),
            wrong_penalty: default_apply_wrong_penalty(),
            hint_penalty: default_hint_penalty(),
            hint_charge: HintCharge::default(),
            feedback_delay_ms: default_apply_feedback_delay_ms(),
            star_thresholds: default_apply_stars(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_millis: default_tick_millis(),
            rush: RushConfig::default(),
            apply: ApplyConfig::default(),
        }
    }
}

/// Validated, mode-specific rules a session runs under.
#[derive(Clone, Debug, PartialEq)]
pub enum Rules {
    Rush(RushConfig),
    Apply(ApplyConfig),
}

impl Rules {
    pub fn mode(&self) -> GameMode {
        match self {
            Rules::Rush(_) => GameMode::Rush,
            Rules::Apply(_) => GameMode::Apply,
        }
    }

    pub fn questions_per_game(&self) -> usize {
        match self {
            Rules::Rush(r) => r.questions_per_game,
            Rules::Apply(a) => a.questions_per_game,
        }
    }

    pub fn options_per_question(&self) -> usize {
        match self {
            Rules::Rush(r) => r.options_per_question,
            Rules::Apply(a) => a.options_per_question,
        }
    }

    pub fn star_thresholds(&self) -> StarThresholds {
        match self {
            Rules::Rush(r) => r.star_thresholds,
            Rules::Apply(a) => a.star_thresholds,
        }
    }

    pub fn feedback_delay_ms(&self) -> u64 {
        match self {
            Rules::Rush(r) => r.feedback_delay_ms,
            Rules::Apply(a) => a.feedback_delay_ms,
        }
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        let options = self.options_per_question();
        if options < 2 {
            return Err(QuizError::config("options_per_question must be at least 2"));
        }
        if options > MAX_OPTIONS_PER_QUESTION {
            return Err(QuizError::config(format!(
                "options_per_question is {options}, at most {MAX_OPTIONS_PER_QUESTION} can be answered"
            )));
        }
        let stars = self.star_thresholds();
        if !(stars.one < stars.two && stars.two < stars.three) {
            return Err(QuizError::config(format!(
                "star thresholds must ascend, got {} / {} / {}",
                stars.one, stars.two, stars.three
            )));
        }

        match self {
            Rules::Rush(r) => {
                if r.total_time == 0 {
                    return Err(QuizError::config("rush total_time must be at least 1"));
                }
                if r.wrong_penalty < 0 {
                    return Err(QuizError::config("rush wrong_penalty is a magnitude and cannot be negative"));
                }
                if r.streak_multiplier_base < 0.0 || r.time_bonus_factor < 0.0 {
                    return Err(QuizError::config("rush bonus factors cannot be negative"));
                }
            }
            Rules::Apply(a) => {
                if a.wrong_penalty > 0 {
                    return Err(QuizError::config("apply wrong_penalty is a delta and cannot be positive"));
                }
                if a.hint_penalty < 0 {
                    return Err(QuizError::config("apply hint_penalty cannot be negative"));
                }
                if a.hint_penalty >= a.correct_points {
                    tracing::warn!(
                        hint_penalty = a.hint_penalty,
                        correct_points = a.correct_points,
                        "hint penalty swallows the whole award; scores will be floored"
                    );
                }
            }
        }

        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("synapse")
            .join("config.toml")
    }

    /// Validated rules for `mode`.
    pub fn rules(&self, mode: GameMode) -> Result<Rules, QuizError> {
        let rules = match mode {
            GameMode::Rush => Rules::Rush(self.rush.clone()),
            GameMode::Apply => Rules::Apply(self.apply.clone()),
        };
        rules.validate()?;
        Ok(rules)
    }
}
