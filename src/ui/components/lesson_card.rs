use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use synapse::catalog::Lesson;

use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

pub struct LessonCard<'a> {
    pub lesson: &'a Lesson,
    pub glyph: &'a str,
    pub page: usize,
    pub total: usize,
    pub theme: &'a Theme,
}

impl<'a> LessonCard<'a> {
    pub fn new(lesson: &'a Lesson, glyph: &'a str, page: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            lesson,
            glyph,
            page,
            total,
            theme,
        }
    }
}

/// One dot per lesson, the current one filled.
fn page_dots(page: usize, total: usize) -> String {
    (0..total)
        .map(|i| if i == page { "\u{25cf}" } else { "\u{25cb}" })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Widget for LessonCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Lesson {}/{} ", self.page + 1, self.total))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height < 4 {
            return;
        }
        let text_width = inner.width.saturating_sub(2) as usize;
        let title = if self.glyph.is_empty() {
            self.lesson.title.clone()
        } else {
            format!("{} {}", self.glyph, self.lesson.title)
        };
        let title_rows = wrapped_line_count(&title, text_width) as u16 + 1;

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(title_rows),
                Constraint::Length(1),
                Constraint::Min(2),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            self.lesson.explanation.as_str(),
            Style::default().fg(colors.fg()),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[2].inner(Margin::new(1, 0)), buf);

        Paragraph::new(Line::from(Span::styled(
            page_dots(self.page, self.total),
            Style::default().fg(colors.dim()),
        )))
        .alignment(Alignment::Center)
        .render(layout[3], buf);
    }
}
