use crate::engine::outcome::Outcome;

/// Cue hooks for audio or visual feedback. Every method defaults to a no-op.
pub trait FeedbackSink {
    fn on_start(&mut self) {}
    fn on_correct(&mut self) {}
    fn on_wrong(&mut self) {}
    fn on_streak(&mut self, _streak: u32) {}
    fn on_urgent_tick(&mut self, _remaining: u32) {}
    fn on_game_over(&mut self, _outcome: &Outcome) {}
}

pub struct SilentFeedback;

impl FeedbackSink for SilentFeedback {}
