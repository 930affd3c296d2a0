use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use synapse::engine::{Mood, Outcome};

use crate::ui::theme::Theme;

pub struct ResultCard<'a> {
    pub outcome: &'a Outcome,
    pub time_up: bool,
    pub theme: &'a Theme,
}

impl<'a> ResultCard<'a> {
    pub fn new(outcome: &'a Outcome, time_up: bool, theme: &'a Theme) -> Self {
        Self {
            outcome,
            time_up,
            theme,
        }
    }
}

fn star_row(stars: u8) -> String {
    (0..3)
        .map(|i| if i < stars { "\u{2605}" } else { "\u{2606}" })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Widget for ResultCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let outcome = self.outcome;

        let title = if self.time_up {
            " Time's Up! "
        } else {
            " Game Complete "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let mood_color = match outcome.mood() {
            Mood::Happy => colors.correct(),
            Mood::Neutral => colors.hint(),
            Mood::Sad => colors.wrong(),
        };
        Paragraph::new(Line::from(vec![
            Span::styled(outcome.mood().face(), Style::default().fg(mood_color)),
            Span::raw("  "),
            Span::styled(
                outcome.verdict(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            star_row(outcome.stars),
            Style::default()
                .fg(colors.star())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("Final score  ", Style::default().fg(colors.fg())),
            Span::styled(
                outcome.final_score.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(layout[2], buf);

        let stats = vec![
            Line::from(vec![
                Span::styled("  Correct:   ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{}/{}", outcome.correct_count, outcome.total_rounds),
                    Style::default().fg(colors.correct()),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Accuracy:  ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{}%", outcome.accuracy_percent()),
                    Style::default().fg(mood_color),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Mode:      ", Style::default().fg(colors.fg())),
                Span::styled(outcome.mode.title(), Style::default().fg(colors.dim())),
            ]),
        ];
        Paragraph::new(stats).render(layout[3], buf);

        Paragraph::new(Line::from(Span::styled(
            "[r] Play again  [m] Menu  [q] Quit",
            Style::default().fg(colors.dim()),
        )))
        .alignment(Alignment::Center)
        .render(layout[5], buf);
    }
}
