use thiserror::Error;

/// Errors raised by the quiz engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The catalog or rules cannot support a session. Surfaced before any round begins.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A command arrived in a round phase that does not accept it.
    #[error("cannot {action} while round is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },
}

impl QuizError {
    pub fn config(msg: impl Into<String>) -> Self {
        QuizError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;
