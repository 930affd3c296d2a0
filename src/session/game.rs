use std::fmt;
use std::mem;
use std::sync::Arc;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::config::Rules;
use crate::engine::clock::{Clock, ClockSignal};
use crate::engine::deck::build_session;
use crate::engine::options::options_for;
use crate::engine::outcome::Outcome;
use crate::engine::scoring;
use crate::error::QuizError;
use crate::session::event::{GameEvent, Question};
use crate::session::feedback::FeedbackSink;
use crate::session::round::{Advance, Resolution, Round, RoundSequencer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Timed: match each concept to its definition.
    Rush,
    /// Untimed: name the concept a scenario describes.
    Apply,
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Rush => "rush",
            GameMode::Apply => "apply",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameMode::Rush => "Synapse Rush",
            GameMode::Apply => "Synapse Apply",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate per-session counters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub mode: GameMode,
    pub score: i64,
    pub streak: u32,
    pub correct: usize,
    pub total_rounds: usize,
    pub current_round: usize,
    pub hint_used: bool,
    /// Only tracked in Rush.
    pub time_remaining: Option<u32>,
}

impl SessionState {
    fn fresh(mode: GameMode, total_rounds: usize, time_remaining: Option<u32>) -> Self {
        Self {
            mode,
            score: 0,
            streak: 0,
            correct: 0,
            total_rounds,
            current_round: 0,
            hint_used: false,
            time_remaining,
        }
    }
}

/// One run of a game mode: deals the deck, presents rounds, scores answers,
/// runs the Rush clock and produces the final [`Outcome`].
///
/// Commands mutate the session and queue [`GameEvent`]s; the presentation
/// layer drains them with [`Session::take_events`].
pub struct Session {
    rules: Rules,
    catalog: Arc<Catalog>,
    rng: SmallRng,
    feedback: Box<dyn FeedbackSink>,
    deck: Vec<Question>,
    sequencer: RoundSequencer,
    state: SessionState,
    clock: Option<Clock>,
    events: Vec<GameEvent>,
    outcome: Option<Outcome>,
}

impl Session {
    /// Validate inputs, deal the deck and present the first round.
    pub fn start(
        catalog: Arc<Catalog>,
        rules: Rules,
        rng: SmallRng,
        feedback: Box<dyn FeedbackSink>,
    ) -> Result<Self, QuizError> {
        rules.validate()?;
        catalog.validate()?;

        let mode = rules.mode();
        let mut session = Self {
            rules,
            catalog,
            rng,
            feedback,
            deck: Vec::new(),
            sequencer: RoundSequencer::new(0),
            state: SessionState::fresh(mode, 0, None),
            clock: None,
            events: Vec::new(),
            outcome: None,
        };
        session.begin()?;
        Ok(session)
    }

    /// Throw away the current run and start over with a fresh deck.
    pub fn restart(&mut self) -> Result<(), QuizError> {
        tracing::debug!(mode = %self.mode(), "restarting session");
        self.clock = None;
        self.events.clear();
        self.outcome = None;
        self.begin()
    }

    fn begin(&mut self) -> Result<(), QuizError> {
        let mode = self.rules.mode();
        let rounds = self.rules.questions_per_game();
        let option_count = self.rules.options_per_question();
        if self.catalog.concepts.len() < option_count {
            return Err(QuizError::config(format!(
                "{option_count} options per question but catalog only has {} concepts",
                self.catalog.concepts.len()
            )));
        }

        self.deck = match mode {
            GameMode::Rush => build_session(&self.catalog.concepts, rounds, &mut self.rng)?
                .iter()
                .map(Question::from_concept)
                .collect(),
            GameMode::Apply => build_session(&self.catalog.scenarios, rounds, &mut self.rng)?
                .iter()
                .map(Question::from_scenario)
                .collect(),
        };

        self.clock = match &self.rules {
            Rules::Rush(r) => Some(Clock::new(r.total_time, r.urgent_time_threshold)),
            Rules::Apply(_) => None,
        };
        self.sequencer = RoundSequencer::new(self.deck.len());
        self.state = SessionState::fresh(
            mode,
            self.deck.len(),
            self.clock.as_ref().map(Clock::remaining),
        );
        self.outcome = None;

        tracing::info!(mode = %mode, rounds = self.deck.len(), "session started");
        self.feedback.on_start();

        if self.sequencer.is_terminal() {
            self.finalize();
            return Ok(());
        }
        self.present_current()
    }

    fn present_current(&mut self) -> Result<(), QuizError> {
        let index = self.sequencer.current_index();
        let Some(question) = self.deck.get(index).cloned() else {
            return Err(QuizError::config(format!("no question dealt for round {index}")));
        };
        let Some(target) = self.catalog.concept(question.answer_id).cloned() else {
            return Err(QuizError::config(format!(
                "question {} answers unknown concept {}",
                question.item_id, question.answer_id
            )));
        };

        let options = options_for(
            &target,
            &self.catalog.concepts,
            self.rules.options_per_question(),
            &mut self.rng,
        )?;
        self.sequencer
            .present(target.id, options.iter().map(|o| o.id).collect())?;

        self.state.current_round = index;
        self.events.push(GameEvent::RoundPresented {
            index,
            total: self.deck.len(),
            question,
            options,
        });
        Ok(())
    }

    /// Submit an answer for the open round. Returns `None` when the answer is
    /// not accepted: a second answer for the same round, or anything after
    /// the game ended.
    pub fn handle_answer(&mut self, selected_id: u32) -> Option<Resolution> {
        if self.outcome.is_some() {
            tracing::debug!(selected_id, "answer after game over ignored");
            return None;
        }
        let Some(resolution) = self.sequencer.submit(selected_id) else {
            tracing::debug!(selected_id, "answer outside an open round ignored");
            return None;
        };

        let before = self.state.score;
        let mut time_penalty = 0;
        if resolution.correct {
            self.state.streak += 1;
            self.state.correct += 1;
        } else {
            self.state.streak = 0;
        }

        match &self.rules {
            Rules::Rush(r) => {
                if resolution.correct {
                    let remaining = self.clock.as_ref().map_or(0, Clock::remaining);
                    let points = scoring::rush_correct_points(r, self.state.streak, remaining);
                    self.state.score = scoring::apply_delta(self.state.score, points);
                } else {
                    self.state.score = scoring::apply_penalty(self.state.score, r.wrong_penalty);
                    time_penalty = r.time_penalty;
                }
            }
            Rules::Apply(a) => {
                let delta = if resolution.correct {
                    scoring::apply_correct_points(a, self.state.hint_used)
                } else {
                    a.wrong_penalty
                };
                self.state.score = scoring::apply_delta(self.state.score, delta);
            }
        }

        self.events.push(GameEvent::AnswerResolved {
            correct: resolution.correct,
            selected_id,
            target_id: resolution.target_id,
            delta: self.state.score - before,
        });
        self.events.push(GameEvent::ScoreChanged {
            score: self.state.score,
            streak: self.state.streak,
        });
        self.cue_answer(resolution.correct);

        if let Err(err) = self.sequencer.resolve() {
            tracing::warn!(%err, "round could not be resolved");
        }

        if time_penalty > 0 {
            let signal = match self.clock.as_mut() {
                Some(clock) => clock.penalize(time_penalty),
                None => ClockSignal::Idle,
            };
            self.on_clock_signal(signal, false);
        }
        if self.outcome.is_some() {
            return Some(resolution);
        }
        if self.sequencer.is_last_round() {
            match self.sequencer.advance() {
                Ok(Advance::Terminal) => {
                    self.state.current_round = self.sequencer.current_index();
                    self.finalize();
                }
                Ok(Advance::Next(_)) => self.events.push(GameEvent::ReadyToAdvance),
                Err(err) => tracing::warn!(%err, "last round could not advance"),
            }
        } else {
            self.events.push(GameEvent::ReadyToAdvance);
        }
        Some(resolution)
    }

    fn cue_answer(&mut self, correct: bool) {
        if !correct {
            self.feedback.on_wrong();
            return;
        }
        let streak = self.state.streak;
        match &self.rules {
            Rules::Rush(r) if scoring::is_streak_signal(r, streak) => {
                self.feedback.on_streak(streak);
                self.events.push(GameEvent::StreakReached { streak });
            }
            _ => self.feedback.on_correct(),
        }
    }

    /// Reveal the hint for the open Apply round, at most once per round.
    /// Returns the hint text when it was revealed by this call.
    pub fn request_hint(&mut self) -> Option<String> {
        let Rules::Apply(rules) = &self.rules else {
            return None;
        };
        if self.outcome.is_some() || self.state.hint_used {
            return None;
        }
        let round = self.sequencer.current_round()?;
        if round.selected_id.is_some() {
            return None;
        }
        let hint = self.deck.get(round.index)?.hint.clone()?;

        let cost = scoring::hint_request_cost(rules);
        let before = self.state.score;
        self.state.score = scoring::apply_penalty(before, cost);
        self.state.hint_used = true;

        self.events.push(GameEvent::HintRevealed {
            hint: hint.clone(),
            cost: before - self.state.score,
        });
        if self.state.score != before {
            self.events.push(GameEvent::ScoreChanged {
                score: self.state.score,
                streak: self.state.streak,
            });
        }
        Some(hint)
    }

    /// Move past a resolved round and present the next one.
    pub fn advance(&mut self) -> Result<(), QuizError> {
        match self.sequencer.advance()? {
            Advance::Next(index) => {
                self.state.current_round = index;
                self.state.hint_used = false;
                self.present_current()
            }
            Advance::Terminal => {
                self.state.current_round = self.sequencer.current_index();
                self.finalize();
                Ok(())
            }
        }
    }

    /// One clock period elapsed. No-op outside Rush or after game over.
    pub fn tick(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let signal = match self.clock.as_mut() {
            Some(clock) => clock.tick(),
            None => return,
        };
        self.on_clock_signal(signal, true);
    }

    fn on_clock_signal(&mut self, signal: ClockSignal, from_tick: bool) {
        match signal {
            ClockSignal::Running(remaining) => {
                self.state.time_remaining = Some(remaining);
                self.events.push(GameEvent::TimeChanged {
                    remaining,
                    urgent: false,
                });
            }
            ClockSignal::Urgent(remaining) => {
                self.state.time_remaining = Some(remaining);
                self.events.push(GameEvent::TimeChanged {
                    remaining,
                    urgent: true,
                });
                if from_tick {
                    self.feedback.on_urgent_tick(remaining);
                }
            }
            ClockSignal::Expired => {
                self.state.time_remaining = Some(0);
                self.events.push(GameEvent::TimeChanged {
                    remaining: 0,
                    urgent: false,
                });
                self.events.push(GameEvent::ClockExpired);
                tracing::info!(score = self.state.score, "clock expired");
                self.finalize();
            }
            ClockSignal::Idle => {}
        }
    }

    /// Freeze the current state into an [`Outcome`]. Ends the game if it is
    /// still running; repeated calls return the same outcome.
    pub fn finish(&mut self) -> Outcome {
        self.finalize()
    }

    fn finalize(&mut self) -> Outcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        self.sequencer.finish();
        self.clock = None;
        let outcome = Outcome::new(
            self.state.mode,
            self.state.score,
            self.state.correct,
            self.state.total_rounds,
            &self.rules.star_thresholds(),
        );
        tracing::info!(
            mode = %outcome.mode,
            score = outcome.final_score,
            correct = outcome.correct_count,
            total = outcome.total_rounds,
            stars = outcome.stars,
            "game over"
        );
        self.feedback.on_game_over(&outcome);
        self.events.push(GameEvent::GameOver(outcome.clone()));
        self.outcome = Some(outcome.clone());
        outcome
    }

    /// Drain queued events in emission order.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn round(&self) -> Option<&Round> {
        self.sequencer.current_round()
    }

    pub fn sequencer(&self) -> &RoundSequencer {
        &self.sequencer
    }

    pub fn current_question(&self) -> Option<&Question> {
        let round = self.sequencer.current_round()?;
        self.deck.get(round.index)
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Fraction of Rush time left, `None` in Apply or after the clock is gone.
    pub fn time_ratio(&self) -> Option<f64> {
        self.clock.as_ref().map(Clock::ratio)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;

    use super::*;
    use crate::config::{ApplyConfig, Config, HintCharge, RushConfig};

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Cue {
        Start,
        Correct,
        Wrong,
        Streak(u32),
        Urgent(u32),
        GameOver,
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Cue>>>);

    impl FeedbackSink for Recorder {
        fn on_start(&mut self) {
            self.0.borrow_mut().push(Cue::Start);
        }
        fn on_correct(&mut self) {
            self.0.borrow_mut().push(Cue::Correct);
        }
        fn on_wrong(&mut self) {
            self.0.borrow_mut().push(Cue::Wrong);
        }
        fn on_streak(&mut self, streak: u32) {
            self.0.borrow_mut().push(Cue::Streak(streak));
        }
        fn on_urgent_tick(&mut self, remaining: u32) {
            self.0.borrow_mut().push(Cue::Urgent(remaining));
        }
        fn on_game_over(&mut self, _outcome: &Outcome) {
            self.0.borrow_mut().push(Cue::GameOver);
        }
    }

    fn session(mode: GameMode, rules: Rules, seed: u64) -> (Session, Recorder) {
        let recorder = Recorder::default();
        let session = Session::start(
            Arc::new(Catalog::builtin(mode)),
            rules,
            SmallRng::seed_from_u64(seed),
            Box::new(recorder.clone()),
        )
        .unwrap();
        (session, recorder)
    }

    fn rush(seed: u64) -> (Session, Recorder) {
        session(GameMode::Rush, Rules::Rush(RushConfig::default()), seed)
    }

    fn apply(seed: u64) -> (Session, Recorder) {
        session(GameMode::Apply, Rules::Apply(ApplyConfig::default()), seed)
    }

    fn target(session: &Session) -> u32 {
        session.round().unwrap().target_id
    }

    fn wrong(session: &Session) -> u32 {
        let round = session.round().unwrap();
        *round.options.iter().find(|&&id| id != round.target_id).unwrap()
    }

    #[test]
    fn test_start_presents_first_round() {
        let (mut s, cues) = rush(1);
        let events = s.take_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::RoundPresented { index: 0, total: 12, .. }]
        ));
        if let GameEvent::RoundPresented {
            question, options, ..
        } = &events[0]
        {
            assert_eq!(options.len(), 4);
            assert_eq!(options.iter().filter(|o| o.id == question.answer_id).count(), 1);
        }
        assert_eq!(s.state().time_remaining, Some(60));
        assert_eq!(cues.0.borrow().as_slice(), &[Cue::Start]);
    }

    #[test]
    fn test_rush_second_correct_answer_with_thirty_seconds() {
        let (mut s, _) = rush(2);
        for _ in 0..30 {
            s.tick();
        }
        let first = target(&s);
        s.handle_answer(first).unwrap();
        // 100 base + 30 * 2 time bonus
        assert_eq!(s.state().score, 160);
        s.advance().unwrap();
        s.take_events();

        let second = target(&s);
        s.handle_answer(second).unwrap();
        let events = s.take_events();
        assert!(events.contains(&GameEvent::AnswerResolved {
            correct: true,
            selected_id: second,
            target_id: second,
            delta: 210,
        }));
        assert_eq!(s.state().score, 370);
        assert_eq!(s.state().streak, 2);
    }

    #[test]
    fn test_rush_wrong_answer_floors_score_and_costs_time() {
        let (mut s, cues) = rush(3);
        let pick = wrong(&s);
        let resolution = s.handle_answer(pick).unwrap();
        assert!(!resolution.correct);
        assert_eq!(s.state().score, 0);
        assert_eq!(s.state().time_remaining, Some(57));
        assert_eq!(s.state().streak, 0);
        let events = s.take_events();
        assert!(events.contains(&GameEvent::TimeChanged {
            remaining: 57,
            urgent: false
        }));
        assert_eq!(events.last(), Some(&GameEvent::ReadyToAdvance));
        assert_eq!(cues.0.borrow().last(), Some(&Cue::Wrong));
    }

    #[test]
    fn test_streak_signal_on_third_correct() {
        let (mut s, cues) = rush(4);
        for _ in 0..3 {
            let t = target(&s);
            s.handle_answer(t).unwrap();
            s.advance().unwrap();
        }
        let cues = cues.0.borrow();
        assert_eq!(
            cues.as_slice(),
            &[Cue::Start, Cue::Correct, Cue::Correct, Cue::Streak(3)]
        );
        assert!(s.take_events().contains(&GameEvent::StreakReached { streak: 3 }));
    }

    #[test]
    fn test_duplicate_answer_is_ignored() {
        let (mut s, _) = rush(5);
        let t = target(&s);
        assert!(s.handle_answer(t).is_some());
        let score = s.state().score;
        assert!(s.handle_answer(t).is_none());
        assert!(s.handle_answer(wrong(&s)).is_none());
        assert_eq!(s.state().score, score);
        assert_eq!(s.state().correct, 1);
    }

    #[test]
    fn test_advance_before_answer_is_rejected() {
        let (mut s, _) = rush(6);
        assert!(matches!(
            s.advance(),
            Err(QuizError::InvalidTransition { action: "advance", .. })
        ));
        assert_eq!(s.state().current_round, 0);
    }

    #[test]
    fn test_clock_expiry_ends_game_once() {
        let (mut s, cues) = rush(7);
        for _ in 0..100 {
            s.tick();
        }
        let events = s.take_events();
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count();
        assert_eq!(game_overs, 1);
        assert!(events.contains(&GameEvent::ClockExpired));
        assert!(s.is_over());
        assert!(s.sequencer().is_terminal());

        // urgent cues for 10..=1, then game over
        let urgent = cues
            .0
            .borrow()
            .iter()
            .filter(|c| matches!(c, Cue::Urgent(_)))
            .count();
        assert_eq!(urgent, 10);

        let t = 1;
        assert!(s.handle_answer(t).is_none());
        assert_eq!(s.outcome().unwrap().total_rounds, 12);
    }

    #[test]
    fn test_time_penalty_can_expire_clock() {
        let mut rules = RushConfig::default();
        rules.total_time = 3;
        let (mut s, _) = session(GameMode::Rush, Rules::Rush(rules), 8);
        let pick = wrong(&s);
        s.handle_answer(pick).unwrap();
        assert!(s.is_over());
        let events = s.take_events();
        assert!(events.contains(&GameEvent::ClockExpired));
        assert!(!events.contains(&GameEvent::ReadyToAdvance));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver(_)))
                .count(),
            1
        );
    }

    #[test]
    fn test_apply_hint_then_correct_nets_85() {
        let (mut s, _) = apply(9);
        let t = target(&s);
        s.handle_answer(t).unwrap();
        s.advance().unwrap();
        assert_eq!(s.state().score, 100);

        let hint = s.request_hint();
        assert!(hint.is_some());
        assert_eq!(s.state().score, 85);
        let t = target(&s);
        s.handle_answer(t).unwrap();
        assert_eq!(s.state().score, 185);
    }

    #[test]
    fn test_hint_at_zero_score_is_floored() {
        let (mut s, _) = apply(9);
        s.take_events();
        assert_eq!(s.state().score, 0);

        assert!(s.request_hint().is_some());
        assert_eq!(s.state().score, 0);
        let events = s.take_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::HintRevealed { cost: 0, .. }]
        ));

        let t = target(&s);
        s.handle_answer(t).unwrap();
        assert_eq!(s.state().score, 100);
    }

    #[test]
    fn test_hint_below_penalty_takes_what_is_left() {
        let rules = ApplyConfig {
            correct_points: 10,
            ..ApplyConfig::default()
        };
        let (mut s, _) = session(GameMode::Apply, Rules::Apply(rules), 9);
        let t = target(&s);
        s.handle_answer(t).unwrap();
        s.advance().unwrap();
        s.take_events();
        assert_eq!(s.state().score, 10);

        s.request_hint().unwrap();
        assert_eq!(s.state().score, 0);
        let events = s.take_events();
        assert!(events.contains(&GameEvent::ScoreChanged { score: 0, streak: 1 }));
        assert!(matches!(
            events.first(),
            Some(GameEvent::HintRevealed { cost: 10, .. })
        ));
    }

    #[test]
    fn test_hint_deducted_once_per_round() {
        let (mut s, _) = apply(10);
        let t = target(&s);
        s.handle_answer(t).unwrap();
        s.advance().unwrap();

        assert!(s.request_hint().is_some());
        for _ in 0..5 {
            assert!(s.request_hint().is_none());
        }
        assert_eq!(s.state().score, 85);
        let hints = s
            .take_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::HintRevealed { .. }))
            .count();
        assert_eq!(hints, 1);
    }

    #[test]
    fn test_hint_flag_resets_on_advance() {
        let (mut s, _) = apply(11);
        s.request_hint().unwrap();
        assert!(s.state().hint_used);
        let t = target(&s);
        s.handle_answer(t).unwrap();
        assert!(s.state().hint_used);
        s.advance().unwrap();
        assert!(!s.state().hint_used);
        assert!(s.request_hint().is_some());
    }

    #[test]
    fn test_hint_after_answer_is_refused() {
        let (mut s, _) = apply(12);
        let t = target(&s);
        s.handle_answer(t).unwrap();
        assert!(s.request_hint().is_none());
        assert_eq!(s.state().score, 100);
    }

    #[test]
    fn test_hint_is_noop_in_rush() {
        let (mut s, _) = rush(13);
        assert!(s.request_hint().is_none());
        assert!(!s.state().hint_used);
    }

    #[test]
    fn test_apply_wrong_answer_floors_at_zero() {
        let (mut s, _) = apply(14);
        let t = target(&s);
        s.handle_answer(t).unwrap();
        s.advance().unwrap();
        s.request_hint().unwrap();
        // 100 - 15 = 85
        s.handle_answer(wrong(&s)).unwrap();
        assert_eq!(s.state().score, 60);
        s.advance().unwrap();
        s.handle_answer(wrong(&s)).unwrap();
        s.advance().unwrap();
        s.handle_answer(wrong(&s)).unwrap();
        s.advance().unwrap();
        s.handle_answer(wrong(&s)).unwrap();
        assert_eq!(s.state().score, 0);
    }

    #[test]
    fn test_hint_charged_on_correct_policy() {
        let rules = ApplyConfig {
            hint_charge: HintCharge::OnCorrect,
            ..ApplyConfig::default()
        };
        let (mut s, _) = session(GameMode::Apply, Rules::Apply(rules), 15);
        s.request_hint().unwrap();
        assert_eq!(s.state().score, 0);
        let t = target(&s);
        s.handle_answer(t).unwrap();
        assert_eq!(s.state().score, 85);
    }

    #[test]
    fn test_last_round_emits_single_game_over() {
        let mut rules = ApplyConfig::default();
        rules.questions_per_game = 2;
        let (mut s, cues) = session(GameMode::Apply, Rules::Apply(rules), 16);
        let t = target(&s);
        s.handle_answer(t).unwrap();
        s.advance().unwrap();
        let t = target(&s);
        s.handle_answer(t).unwrap();

        assert!(s.sequencer().is_terminal());
        let events = s.take_events();
        let outcomes: Vec<&Outcome> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GameOver(o) => Some(o),
                _ => None,
            })
            .collect();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].correct_count, 2);
        assert_eq!(outcomes[0].final_score, 200);
        assert!(!events.contains(&GameEvent::ReadyToAdvance));

        assert!(s.advance().is_err());
        let again = s.finish();
        assert_eq!(&again, outcomes[0]);
        assert!(s.take_events().is_empty());
        assert_eq!(
            cues.0
                .borrow()
                .iter()
                .filter(|c| **c == Cue::GameOver)
                .count(),
            1
        );
    }

    #[test]
    fn test_zero_rounds_is_immediately_over() {
        let mut rules = ApplyConfig::default();
        rules.questions_per_game = 0;
        let (mut s, _) = session(GameMode::Apply, Rules::Apply(rules), 17);
        assert!(s.is_over());
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.total_rounds, 0);
        assert_eq!(outcome.accuracy_percent(), 0);
        assert_eq!(s.take_events().len(), 1);
    }

    #[test]
    fn test_restart_resets_state() {
        let (mut s, _) = rush(18);
        let t = target(&s);
        s.handle_answer(t).unwrap();
        s.tick();
        s.finish();
        assert!(s.is_over());

        s.restart().unwrap();
        assert!(!s.is_over());
        assert_eq!(s.state().score, 0);
        assert_eq!(s.state().streak, 0);
        assert_eq!(s.state().time_remaining, Some(60));
        let events = s.take_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::RoundPresented { index: 0, .. }]
        ));
    }

    #[test]
    fn test_start_rejects_oversized_deck() {
        let mut config = Config::default();
        config.rush.questions_per_game = 13;
        let result = Session::start(
            Arc::new(Catalog::builtin(GameMode::Rush)),
            config.rules(GameMode::Rush).unwrap(),
            SmallRng::seed_from_u64(0),
            Box::new(crate::session::SilentFeedback),
        );
        assert!(matches!(result, Err(QuizError::Configuration(_))));
    }

    #[test]
    fn test_apply_without_scenarios_is_a_configuration_error() {
        let result = Session::start(
            Arc::new(Catalog::builtin(GameMode::Rush)),
            Rules::Apply(ApplyConfig::default()),
            SmallRng::seed_from_u64(0),
            Box::new(crate::session::SilentFeedback),
        );
        assert!(matches!(result, Err(QuizError::Configuration(_))));
    }
}
