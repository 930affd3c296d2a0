use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use synapse::config::MAX_OPTIONS_PER_QUESTION;
use synapse::session::GameMode;

use crate::app::RoundView;
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

pub const OPTION_LETTERS: [char; MAX_OPTIONS_PER_QUESTION] = ['A', 'B', 'C', 'D'];

pub struct QuestionPanel<'a> {
    pub round: &'a RoundView,
    pub mode: GameMode,
    pub streak_flash: Option<u32>,
    pub theme: &'a Theme,
}

impl<'a> QuestionPanel<'a> {
    pub fn new(round: &'a RoundView, mode: GameMode, streak_flash: Option<u32>, theme: &'a Theme) -> Self {
        Self {
            round,
            mode,
            streak_flash,
            theme,
        }
    }

    /// Option text: definitions in Rush, concept names in Apply.
    fn option_text(&self, slot: usize) -> String {
        let option = &self.round.options[slot];
        let letter = OPTION_LETTERS.get(slot).copied().unwrap_or('?');
        match self.mode {
            GameMode::Rush => format!("{letter}) {}", option.definition),
            GameMode::Apply if option.glyph.is_empty() => format!("{letter}) {}", option.label),
            GameMode::Apply => format!("{letter}) {} {}", option.glyph, option.label),
        }
    }

    fn feedback_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        match (self.round.correct, self.round.delta) {
            (Some(true), Some(delta)) => {
                let mut spans = vec![Span::styled(
                    format!("Correct! +{delta}"),
                    Style::default()
                        .fg(colors.correct())
                        .add_modifier(Modifier::BOLD),
                )];
                if let Some(streak) = self.streak_flash {
                    spans.push(Span::styled(
                        format!("  {streak} in a row!"),
                        Style::default().fg(colors.star()),
                    ));
                }
                Line::from(spans)
            }
            (Some(false), Some(delta)) => Line::from(Span::styled(
                format!("Not quite. {delta}"),
                Style::default()
                    .fg(colors.wrong())
                    .add_modifier(Modifier::BOLD),
            )),
            _ => Line::from(""),
        }
    }
}

impl Widget for QuestionPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " Question {}/{} ",
                self.round.index + 1,
                self.round.total
            ))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height < 4 {
            return;
        }
        let text_width = inner.width.saturating_sub(2) as usize;

        let (prompt, ask) = match self.mode {
            GameMode::Rush => {
                let label = if self.round.question.glyph.is_empty() {
                    self.round.question.prompt.clone()
                } else {
                    format!("{} {}", self.round.question.glyph, self.round.question.prompt)
                };
                (label, "Which definition matches?")
            }
            GameMode::Apply => (self.round.question.prompt.clone(), "Which concept applies?"),
        };
        let prompt_rows = wrapped_line_count(&prompt, text_width) as u16 + 2;

        let option_rows: Vec<u16> = (0..self.round.options.len())
            .map(|slot| wrapped_line_count(&self.option_text(slot), text_width) as u16 + 1)
            .collect();

        let mut constraints = vec![Constraint::Length(prompt_rows), Constraint::Length(1)];
        constraints.extend(option_rows.iter().map(|&rows| Constraint::Length(rows)));
        constraints.push(Constraint::Length(2));
        constraints.push(Constraint::Min(1));

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                prompt,
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(ask, Style::default().fg(colors.dim()))))
            .alignment(Alignment::Center)
            .render(layout[1], buf);

        let answered = self.round.selected.is_some();
        for slot in 0..self.round.options.len() {
            let option = &self.round.options[slot];
            let is_answer = option.id == self.round.question.answer_id;
            let is_selected = self.round.selected == Some(option.id);

            let style = if answered && is_answer {
                Style::default()
                    .fg(colors.correct())
                    .add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default()
                    .fg(colors.wrong())
                    .add_modifier(Modifier::CROSSED_OUT)
            } else if answered {
                Style::default().fg(colors.dim())
            } else {
                Style::default().fg(colors.fg())
            };

            Paragraph::new(Line::from(Span::styled(self.option_text(slot), style)))
                .wrap(Wrap { trim: true })
                .render(layout[2 + slot].inner(Margin::new(1, 0)), buf);
        }

        let base = 2 + self.round.options.len();
        let mut lines = vec![self.feedback_line()];
        if let Some(ref hint) = self.round.hint {
            let cost = if self.round.hint_cost > 0 {
                format!(" (-{})", self.round.hint_cost)
            } else {
                String::new()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("Hint{cost}: "), Style::default().fg(colors.hint())),
                Span::styled(hint.clone(), Style::default().fg(colors.fg())),
            ]));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(layout[base].union(layout[base + 1]), buf);
    }
}
