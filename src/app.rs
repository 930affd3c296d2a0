use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use synapse::catalog::{Catalog, ConceptItem, Lesson};
use synapse::config::Config;
use synapse::engine::Outcome;
use synapse::session::{FeedbackSink, GameEvent, GameMode, Question, Session, SilentFeedback};

use crate::cue::BellFeedback;
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Playing,
    GameOver,
    Learn,
}

/// What to do once the feedback pause is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pending {
    Advance,
    ShowResult,
}

/// The open round as the question screen draws it.
#[derive(Clone, Debug)]
pub struct RoundView {
    pub index: usize,
    pub total: usize,
    pub question: Question,
    pub options: Vec<ConceptItem>,
    pub selected: Option<u32>,
    pub correct: Option<bool>,
    pub delta: Option<i64>,
    pub hint: Option<String>,
    pub hint_cost: i64,
}

/// Launch settings gathered from the command line.
#[derive(Clone, Debug, Default)]
pub struct LaunchOptions {
    pub seed: Option<u64>,
    pub catalog: Option<Arc<Catalog>>,
    pub quiet: bool,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub session: Option<Session>,
    pub round: Option<RoundView>,
    pub score: i64,
    pub streak: u32,
    pub streak_flash: Option<u32>,
    pub time_remaining: Option<u32>,
    pub urgent: bool,
    pub time_up: bool,
    pub outcome: Option<Outcome>,
    pub status: Option<String>,
    pub should_quit: bool,
    pub lesson_page: usize,
    lessons: Option<Arc<Catalog>>,
    pending: Option<(Instant, Pending)>,
    next_clock_tick: Option<Instant>,
    launch: LaunchOptions,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, launch: LaunchOptions) -> Self {
        Self {
            screen: AppScreen::Menu,
            menu: Menu::new(theme),
            theme,
            config,
            session: None,
            round: None,
            score: 0,
            streak: 0,
            streak_flash: None,
            time_remaining: None,
            urgent: false,
            time_up: false,
            outcome: None,
            status: None,
            should_quit: false,
            lesson_page: 0,
            lessons: None,
            pending: None,
            next_clock_tick: None,
            launch,
        }
    }

    fn catalog_for(&self, mode: GameMode) -> Arc<Catalog> {
        match &self.launch.catalog {
            Some(catalog) => Arc::clone(catalog),
            None => Arc::new(Catalog::builtin(mode)),
        }
    }

    fn feedback(&self) -> Box<dyn FeedbackSink> {
        if self.launch.quiet {
            Box::new(SilentFeedback)
        } else {
            Box::new(BellFeedback)
        }
    }

    fn rng(&self) -> SmallRng {
        match self.launch.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    fn tick_period(&self) -> Duration {
        Duration::from_millis(self.config.tick_millis.max(1))
    }

    /// Start a fresh session of `mode`. Configuration problems stay on the
    /// menu with a status line.
    pub fn start_game(&mut self, mode: GameMode, now: Instant) {
        self.menu.select(MenuAction::Play(mode));
        let started = self
            .config
            .rules(mode)
            .and_then(|rules| Session::start(self.catalog_for(mode), rules, self.rng(), self.feedback()));

        match started {
            Ok(session) => {
                self.session = Some(session);
                self.status = None;
                self.reset_view(now);
                self.screen = AppScreen::Playing;
                self.drain_events(now);
            }
            Err(err) => {
                tracing::error!(%err, mode = %mode, "could not start session");
                self.session = None;
                self.status = Some(err.to_string());
                self.screen = AppScreen::Menu;
            }
        }
    }

    pub fn restart(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(err) = session.restart() {
            tracing::error!(%err, "restart failed");
            self.status = Some(err.to_string());
            self.go_to_menu();
            return;
        }
        self.reset_view(now);
        self.screen = AppScreen::Playing;
        self.drain_events(now);
    }

    /// Dropping the session discards its clock and open round.
    pub fn go_to_menu(&mut self) {
        self.session = None;
        self.lessons = None;
        self.pending = None;
        self.next_clock_tick = None;
        self.round = None;
        self.screen = AppScreen::Menu;
    }

    /// Open the lessons of the Apply catalog (or the one given on the command line).
    pub fn open_lessons(&mut self) {
        self.menu.select(MenuAction::Learn);
        let catalog = self.catalog_for(GameMode::Apply);
        if catalog.lessons.is_empty() {
            tracing::warn!("catalog has no lessons");
            self.status = Some("This catalog has no lessons".to_string());
            return;
        }
        tracing::info!(lessons = catalog.lessons.len(), "opening lessons");
        self.lessons = Some(catalog);
        self.lesson_page = 0;
        self.status = None;
        self.screen = AppScreen::Learn;
    }

    pub fn next_lesson(&mut self) {
        let total = self.lessons.as_ref().map_or(0, |c| c.lessons.len());
        if self.lesson_page + 1 < total {
            self.lesson_page += 1;
        }
    }

    pub fn prev_lesson(&mut self) {
        self.lesson_page = self.lesson_page.saturating_sub(1);
    }

    /// The open lesson with its concept glyph and the lesson count.
    pub fn current_lesson(&self) -> Option<(&Lesson, &str, usize)> {
        let catalog = self.lessons.as_ref()?;
        let lesson = catalog.lessons.get(self.lesson_page)?;
        Some((lesson, catalog.lesson_glyph(lesson), catalog.lessons.len()))
    }

    fn reset_view(&mut self, now: Instant) {
        self.round = None;
        self.score = 0;
        self.streak = 0;
        self.streak_flash = None;
        self.urgent = false;
        self.time_up = false;
        self.outcome = None;
        self.pending = None;
        self.time_remaining = self.session.as_ref().and_then(|s| s.state().time_remaining);
        self.next_clock_tick = self
            .time_remaining
            .map(|_| now + self.tick_period());
    }

    /// Answer with the option at `slot` (0-based, as shown on screen).
    pub fn answer(&mut self, slot: usize, now: Instant) {
        let Some(option_id) = self
            .round
            .as_ref()
            .and_then(|r| r.options.get(slot))
            .map(|o| o.id)
        else {
            return;
        };
        if let Some(session) = self.session.as_mut() {
            session.handle_answer(option_id);
        }
        self.drain_events(now);
    }

    pub fn request_hint(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.request_hint();
        }
        self.drain_events(now);
    }

    /// Drive the Rush clock and the feedback pause. Called on every input
    /// thread tick, which is finer than the clock period.
    pub fn on_tick(&mut self, now: Instant) {
        let period = self.tick_period();
        while let Some(due) = self.next_clock_tick {
            if now < due {
                break;
            }
            match self.session.as_mut() {
                Some(session) if !session.is_over() => session.tick(),
                _ => {
                    self.next_clock_tick = None;
                    break;
                }
            }
            self.next_clock_tick = Some(due + period);
            self.drain_events(now);
        }

        if let Some((due, action)) = self.pending {
            if now >= due {
                self.pending = None;
                match action {
                    Pending::Advance => {
                        if let Some(session) = self.session.as_mut() {
                            if let Err(err) = session.advance() {
                                tracing::warn!(%err, "advance rejected");
                            }
                        }
                        self.drain_events(now);
                    }
                    Pending::ShowResult => self.screen = AppScreen::GameOver,
                }
            }
        }
    }

    fn drain_events(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let delay = Duration::from_millis(session.rules().feedback_delay_ms());
        for event in session.take_events() {
            match event {
                GameEvent::RoundPresented {
                    index,
                    total,
                    question,
                    options,
                } => {
                    self.round = Some(RoundView {
                        index,
                        total,
                        question,
                        options,
                        selected: None,
                        correct: None,
                        delta: None,
                        hint: None,
                        hint_cost: 0,
                    });
                    self.streak_flash = None;
                }
                GameEvent::AnswerResolved {
                    correct,
                    selected_id,
                    delta,
                    ..
                } => {
                    if let Some(round) = self.round.as_mut() {
                        round.selected = Some(selected_id);
                        round.correct = Some(correct);
                        round.delta = Some(delta);
                    }
                }
                GameEvent::HintRevealed { hint, cost } => {
                    if let Some(round) = self.round.as_mut() {
                        round.hint = Some(hint);
                        round.hint_cost = cost;
                    }
                }
                GameEvent::ScoreChanged { score, streak } => {
                    self.score = score;
                    self.streak = streak;
                }
                GameEvent::StreakReached { streak } => self.streak_flash = Some(streak),
                GameEvent::TimeChanged { remaining, urgent } => {
                    self.time_remaining = Some(remaining);
                    self.urgent = urgent;
                }
                GameEvent::ClockExpired => self.time_up = true,
                GameEvent::ReadyToAdvance => self.pending = Some((now + delay, Pending::Advance)),
                GameEvent::GameOver(outcome) => {
                    self.outcome = Some(outcome);
                    self.next_clock_tick = None;
                    self.pending = Some((now + delay, Pending::ShowResult));
                }
            }
        }
    }

    pub fn mode(&self) -> Option<GameMode> {
        self.session.as_ref().map(Session::mode)
    }

    pub fn time_ratio(&self) -> f64 {
        self.session
            .as_ref()
            .and_then(Session::time_ratio)
            .unwrap_or(0.0)
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }
}
