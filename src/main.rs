mod app;
mod cue;
mod event;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing_subscriber::EnvFilter;

use synapse::catalog::Catalog;
use synapse::config::Config;
use synapse::session::GameMode;

use app::{App, AppScreen, LaunchOptions};
use event::{AppEvent, EventHandler};
use ui::components::lesson_card::LessonCard;
use ui::components::menu::MenuAction;
use ui::components::question::QuestionPanel;
use ui::components::result_card::ResultCard;
use ui::components::timer_bar::TimerBar;
use ui::layout::AppLayout;
use ui::theme::Theme;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "synapse", version, about = "Terminal quiz game for learning AI concepts")]
struct Cli {
    #[arg(short, long, value_enum, help = "Skip the menu and start this mode")]
    mode: Option<GameMode>,

    #[arg(short, long, help = "Seed for shuffling, for reproducible games")]
    seed: Option<u64>,

    #[arg(short, long, help = "Config file (default: <config_dir>/synapse/config.toml)")]
    config: Option<PathBuf>,

    #[arg(long, help = "JSON catalog to play instead of the bundled one")]
    catalog: Option<PathBuf>,

    #[arg(short, long, help = "Questions per game")]
    questions: Option<usize>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Disable the terminal bell")]
    quiet: bool,
}

/// Logs go to `<data_dir>/synapse/synapse.log`; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("synapse");
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("synapse.log"))?;

    let filter = EnvFilter::try_from_env("SYNAPSE_LOG").unwrap_or_else(|_| EnvFilter::new("synapse=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = init_logging() {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::warn!(%err, "config unreadable, using defaults");
            Config::default()
        }),
    };
    if let Some(questions) = cli.questions {
        config.rush.questions_per_game = questions;
        config.apply.questions_per_game = questions;
    }
    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }

    let catalog = match &cli.catalog {
        Some(path) => Some(Arc::new(
            Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))?,
        )),
        None => None,
    };

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        tracing::warn!(
            theme = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let mut app = App::new(
        config,
        theme,
        LaunchOptions {
            seed: cli.seed,
            catalog,
            quiet: cli.quiet,
        },
    );
    if let Some(mode) = cli.mode {
        app.start_game(mode, Instant::now());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(POLL_INTERVAL);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        app.on_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Playing => handle_playing_key(app, key),
        AppScreen::GameOver => handle_result_key(app, key),
        AppScreen::Learn => handle_learn_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_game(GameMode::Rush, now),
        KeyCode::Char('2') => app.start_game(GameMode::Apply, now),
        KeyCode::Char('3') => app.open_lessons(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected_action() {
            MenuAction::Play(mode) => app.start_game(mode, now),
            MenuAction::Learn => app.open_lessons(),
        },
        _ => {}
    }
}

/// Option slot for `1`-`4` or `a`-`d`.
fn option_slot(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(c @ '1'..='4') => Some(c as usize - '1' as usize),
        KeyCode::Char(c @ 'a'..='d') => Some(c as usize - 'a' as usize),
        KeyCode::Char(c @ 'A'..='D') => Some(c as usize - 'A' as usize),
        _ => None,
    }
}

fn handle_playing_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    if let Some(slot) = option_slot(key.code) {
        app.answer(slot, now);
        return;
    }
    match key.code {
        KeyCode::Char('h') => app.request_hint(now),
        KeyCode::Char('r') => app.restart(now),
        KeyCode::Esc | KeyCode::Char('m') => app.go_to_menu(),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.restart(Instant::now()),
        KeyCode::Char('m') | KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_learn_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Char(' ') => {
            app.next_lesson()
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => app.prev_lesson(),
        KeyCode::Esc | KeyCode::Char('m') => app.go_to_menu(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Playing => render_playing(frame, app),
        AppScreen::GameOver => render_result(frame, app),
        AppScreen::Learn => render_learn(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area);

    let header = Paragraph::new(Line::from(Span::styled(
        " synapse ",
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let menu_area = ui::layout::centered_rect(50, 60, layout.main);
    frame.render_widget(&app.menu, menu_area);

    let footer = match &app.status {
        Some(status) => Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(colors.wrong()),
        )),
        None => Line::from(Span::styled(
            " [1-3] Start  [Enter] Select  [q] Quit ",
            Style::default().fg(colors.dim()),
        )),
    };
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_playing(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area);
    let Some(mode) = app.mode() else {
        return;
    };

    let mut header_spans = vec![
        Span::styled(
            format!(" {} ", mode.title()),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("| Score {} ", app.score),
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        ),
    ];
    if app.streak > 1 {
        header_spans.push(Span::styled(
            format!("| Streak x{} ", app.streak),
            Style::default().fg(colors.star()).bg(colors.header_bg()),
        ));
    }
    let header = Paragraph::new(Line::from(header_spans)).style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let mut constraints = Vec::new();
    if app.time_remaining.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(8));
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(ui::layout::centered_rect(70, 90, layout.main));

    let mut idx = 0;
    if let Some(remaining) = app.time_remaining {
        let bar = TimerBar::new(remaining, app.time_ratio(), app.urgent, app.theme);
        frame.render_widget(bar, main[idx]);
        idx += 1;
    }

    if let Some(ref round) = app.round {
        let panel = QuestionPanel::new(round, mode, app.streak_flash, app.theme);
        frame.render_widget(panel, main[idx]);
    }

    let keys = match mode {
        GameMode::Rush => " [1-4/a-d] Answer  [r] Restart  [Esc] Menu ",
        GameMode::Apply => " [1-4/a-d] Answer  [h] Hint  [r] Restart  [Esc] Menu ",
    };
    let footer = if app.time_up {
        Line::from(Span::styled(
            " Time's up! ",
            Style::default()
                .fg(colors.urgent())
                .add_modifier(Modifier::BOLD),
        ))
    } else if app.is_waiting() {
        Line::from(Span::styled(" ...", Style::default().fg(colors.dim())))
    } else {
        Line::from(Span::styled(keys, Style::default().fg(colors.dim())))
    };
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_learn(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area);

    let header = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", MenuAction::Learn.title()),
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    if let Some((lesson, glyph, total)) = app.current_lesson() {
        let card = LessonCard::new(lesson, glyph, app.lesson_page, total, app.theme);
        frame.render_widget(card, ui::layout::centered_rect(60, 60, layout.main));
    }

    let footer = Line::from(Span::styled(
        " [\u{2190}/h] Previous  [\u{2192}/l] Next  [Esc] Menu ",
        Style::default().fg(colors.dim()),
    ));
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(ref outcome) = app.outcome {
        let centered = ui::layout::centered_rect(50, 60, area);
        let card = ResultCard::new(outcome, app.time_up, app.theme);
        frame.render_widget(card, centered);
    }
}
