use std::collections::HashSet;
use std::mem;

use crate::error::QuizError;

/// One presented question: the target answer id and the ids on offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    pub index: usize,
    pub target_id: u32,
    pub options: Vec<u32>,
    pub selected_id: Option<u32>,
    pub resolved: bool,
}

impl Round {
    pub fn is_correct(&self) -> bool {
        self.selected_id == Some(self.target_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingPresentation,
    Presented(Round),
    Resolving(Round),
    Resolved(Round),
    Terminal,
}

impl RoundPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RoundPhase::AwaitingPresentation => "awaiting presentation",
            RoundPhase::Presented(_) => "presented",
            RoundPhase::Resolving(_) => "resolving",
            RoundPhase::Resolved(_) => "resolved",
            RoundPhase::Terminal => "terminal",
        }
    }
}

/// Result of the one accepted answer of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub round_index: usize,
    pub target_id: u32,
    pub selected_id: u32,
    pub correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    Terminal,
}

/// Owns the active round and walks it through
/// `AwaitingPresentation -> Presented -> Resolving -> Resolved -> (next | Terminal)`.
///
/// `Resolving` spans the window between accepting an answer and applying its
/// score effects; no further answer or advance is accepted inside it.
#[derive(Clone, Debug)]
pub struct RoundSequencer {
    phase: RoundPhase,
    current_index: usize,
    total_rounds: usize,
}

impl RoundSequencer {
    pub fn new(total_rounds: usize) -> Self {
        let phase = if total_rounds == 0 {
            RoundPhase::Terminal
        } else {
            RoundPhase::AwaitingPresentation
        };
        Self {
            phase,
            current_index: 0,
            total_rounds,
        }
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, RoundPhase::Terminal)
    }

    pub fn is_last_round(&self) -> bool {
        self.current_index + 1 == self.total_rounds
    }

    pub fn current_round(&self) -> Option<&Round> {
        match &self.phase {
            RoundPhase::Presented(round)
            | RoundPhase::Resolving(round)
            | RoundPhase::Resolved(round) => Some(round),
            RoundPhase::AwaitingPresentation | RoundPhase::Terminal => None,
        }
    }

    /// Open the current round. The options must hold `target_id` exactly once
    /// and no duplicates.
    pub fn present(&mut self, target_id: u32, options: Vec<u32>) -> Result<(), QuizError> {
        if !matches!(self.phase, RoundPhase::AwaitingPresentation) {
            return Err(QuizError::InvalidTransition {
                action: "present",
                phase: self.phase.name(),
            });
        }

        let unique: HashSet<u32> = options.iter().copied().collect();
        if unique.len() != options.len() || !unique.contains(&target_id) {
            return Err(QuizError::config(format!(
                "round options {options:?} must contain target {target_id} exactly once"
            )));
        }

        self.phase = RoundPhase::Presented(Round {
            index: self.current_index,
            target_id,
            options,
            selected_id: None,
            resolved: false,
        });
        Ok(())
    }

    /// Accept the answer for the open round and hold it in `Resolving` until
    /// [`RoundSequencer::resolve`]. Returns `None` outside `Presented`, which
    /// makes repeated or late submissions no-ops.
    pub fn submit(&mut self, selected_id: u32) -> Option<Resolution> {
        let mut round = match mem::replace(&mut self.phase, RoundPhase::Terminal) {
            RoundPhase::Presented(round) => round,
            other => {
                self.phase = other;
                return None;
            }
        };

        round.selected_id = Some(selected_id);
        let resolution = Resolution {
            round_index: round.index,
            target_id: round.target_id,
            selected_id,
            correct: round.is_correct(),
        };
        self.phase = RoundPhase::Resolving(round);
        Some(resolution)
    }

    /// Close a `Resolving` round once its score effects are applied.
    pub fn resolve(&mut self) -> Result<(), QuizError> {
        match mem::replace(&mut self.phase, RoundPhase::Terminal) {
            RoundPhase::Resolving(mut round) => {
                round.resolved = true;
                self.phase = RoundPhase::Resolved(round);
                Ok(())
            }
            other => {
                let phase = other.name();
                self.phase = other;
                Err(QuizError::InvalidTransition {
                    action: "resolve",
                    phase,
                })
            }
        }
    }

    /// Leave a resolved round, either to the next one or to `Terminal` after the last.
    pub fn advance(&mut self) -> Result<Advance, QuizError> {
        if !matches!(self.phase, RoundPhase::Resolved(_)) {
            return Err(QuizError::InvalidTransition {
                action: "advance",
                phase: self.phase.name(),
            });
        }

        self.current_index += 1;
        if self.current_index == self.total_rounds {
            self.phase = RoundPhase::Terminal;
            Ok(Advance::Terminal)
        } else {
            self.phase = RoundPhase::AwaitingPresentation;
            Ok(Advance::Next(self.current_index))
        }
    }

    /// Jump straight to `Terminal`, e.g. when the clock runs out.
    pub fn finish(&mut self) {
        self.phase = RoundPhase::Terminal;
    }
}
