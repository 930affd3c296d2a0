use std::io::{self, Write};

use synapse::engine::Outcome;
use synapse::session::FeedbackSink;

/// Audio cues via the terminal bell. One ring for a miss or an urgent tick,
/// two for a streak, three for a celebrated finish.
pub struct BellFeedback;

impl BellFeedback {
    fn ring(times: usize) {
        let mut out = io::stdout();
        let bells = vec![0x07u8; times];
        if let Err(err) = out.write_all(&bells).and_then(|_| out.flush()) {
            tracing::debug!(%err, "terminal bell failed");
        }
    }
}

impl FeedbackSink for BellFeedback {
    fn on_wrong(&mut self) {
        Self::ring(1);
    }

    fn on_streak(&mut self, _streak: u32) {
        Self::ring(2);
    }

    fn on_urgent_tick(&mut self, _remaining: u32) {
        Self::ring(1);
    }

    fn on_game_over(&mut self, outcome: &Outcome) {
        if outcome.celebrate() {
            Self::ring(3);
        }
    }
}
